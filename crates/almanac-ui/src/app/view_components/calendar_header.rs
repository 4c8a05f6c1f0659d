#[derive(Properties, PartialEq)]
struct CalendarHeaderProps {
  title:         String,
  on_prev_year:  Callback<MouseEvent>,
  on_prev_month: Callback<MouseEvent>,
  on_today:      Callback<MouseEvent>,
  on_next_month: Callback<MouseEvent>,
  on_next_year:  Callback<MouseEvent>
}

#[function_component(CalendarHeader)]
fn calendar_header(
  props: &CalendarHeaderProps
) -> Html {
  html! {
      <div class="calendar-header">
          <div class="calendar-nav-actions">
              <button class="btn" title="Previous year" onclick={props.on_prev_year.clone()}>{ "⟪" }</button>
              <button class="btn" title="Previous month" onclick={props.on_prev_month.clone()}>{ "‹" }</button>
          </div>
          <h2>{ props.title.clone() }</h2>
          <div class="calendar-nav-actions">
              <button class="btn" onclick={props.on_today.clone()}>{ "Today" }</button>
              <button class="btn" title="Next month" onclick={props.on_next_month.clone()}>{ "›" }</button>
              <button class="btn" title="Next year" onclick={props.on_next_year.clone()}>{ "⟫" }</button>
          </div>
      </div>
  }
}
