#[derive(Properties, PartialEq)]
struct FilterPanelProps {
  filter:    TaskFilter,
  windows:   Vec<TimeWindow>,
  on_change: Callback<TaskFilter>
}

#[function_component(FilterPanel)]
fn filter_panel(
  props: &FilterPanelProps
) -> Html {
  let on_search = {
    let filter = props.filter.clone();
    let on_change = props.on_change.clone();
    Callback::from(move |e: InputEvent| {
      let input: web_sys::HtmlInputElement =
        e.target_unchecked_into();
      let mut next = filter.clone();
      next.search = input.value();
      on_change.emit(next);
    })
  };

  html! {
      <div class="panel filter-panel">
          <h3>{ "Filters" }</h3>
          <label>
              { "Search by name" }
              <input
                  type="search"
                  placeholder="Search tasks..."
                  value={props.filter.search.clone()}
                  oninput={on_search}
              />
          </label>

          <h4>{ "Categories" }</h4>
          { for Category::ALL.into_iter().map(|category| {
              let filter = props.filter.clone();
              let on_change = props.on_change.clone();
              let checked = props.filter.categories.contains(&category);
              html! {
                  <label>
                      <input
                          type="checkbox"
                          checked={checked}
                          onchange={Callback::from(move |_| {
                              let mut next = filter.clone();
                              next.toggle_category(category);
                              ui_debug("filter.category", category.as_key());
                              on_change.emit(next);
                          })}
                      />
                      { category.label() }
                  </label>
              }
          }) }

          <h4>{ "Time range" }</h4>
          { for props.windows.iter().copied().map(|window| {
              let filter = props.filter.clone();
              let on_change = props.on_change.clone();
              html! {
                  <label>
                      <input
                          type="radio"
                          name="time-window"
                          value={window.as_key()}
                          checked={props.filter.window == window}
                          onchange={Callback::from(move |e: web_sys::Event| {
                              let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                              let mut next = filter.clone();
                              next.window = TimeWindow::from_key(&input.value()).unwrap_or(window);
                              on_change.emit(next);
                          })}
                      />
                      { window.label() }
                  </label>
              }
          }) }
      </div>
  }
}
