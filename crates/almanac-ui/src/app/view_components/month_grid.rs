const DAY_LABEL_HEIGHT: f64 = 24.0;
const LANE_HEIGHT: f64 = 24.0;
const ROW_MIN_HEIGHT: f64 = 96.0;

fn row_height(lanes: usize) -> f64 {
  (DAY_LABEL_HEIGHT
    + lanes as f64 * LANE_HEIGHT
    + 8.0)
    .max(ROW_MIN_HEIGHT)
}

fn bar_style(
  bar: &PlacedBar,
  color: &str
) -> String {
  let column = 100.0 / GRID_COLUMNS as f64;
  let left =
    bar.segment.start_col as f64 * column;
  let width =
    bar.segment.span() as f64 * column;
  format!(
    "left: calc({left:.4}% + 2px); \
     width: calc({width:.4}% - 4px); \
     top: {top}px; background: {color};",
    top = bar.lane as f64 * LANE_HEIGHT
  )
}

#[derive(Properties, PartialEq)]
struct MonthGridProps {
  grid:            MonthGrid,
  layout:          MonthLayout,
  tasks:           Vec<Task>,
  config:          AlmanacConfig,
  selection:
    Option<(NaiveDate, NaiveDate)>,
  resizing:        Option<TaskId>,
  grid_ref:        NodeRef,
  on_pointer_down:
    Callback<web_sys::PointerEvent>,
  on_click:        Callback<MouseEvent>
}

#[function_component(MonthGridView)]
fn month_grid_view(
  props: &MonthGridProps
) -> Html {
  let by_id = props
    .tasks
    .iter()
    .map(|task| (task.id, task))
    .collect::<BTreeMap<_, _>>();
  let today = props
    .grid
    .cells()
    .iter()
    .find(|cell| cell.is_today)
    .map(|cell| cell.date);
  let in_selection = |date: NaiveDate| {
    props.selection.is_some_and(
      |(start, end)| {
        start <= date && date <= end
      }
    )
  };

  let on_pointer_down =
    props.on_pointer_down.clone();
  let on_click = props.on_click.clone();

  html! {
      <>
          <div class="calendar-weekday-row">
              { for WEEKDAY_LABELS.iter().map(|label| html! {
                  <div class="calendar-weekday">{ *label }</div>
              }) }
          </div>
          <div
              class="month-grid"
              ref={props.grid_ref.clone()}
              onpointerdown={on_pointer_down}
              onclick={on_click}
          >
              { for props.grid.rows().enumerate().map(|(row, cells)| {
                  let lanes = props.layout.lane_count[row];
                  html! {
                      <div
                          class="month-row"
                          data-row={row.to_string()}
                          style={format!("min-height: {}px;", row_height(lanes))}
                      >
                          { for cells.iter().map(|cell| {
                              let past = today.is_some_and(|today| cell.date < today);
                              html! {
                                  <div class={classes!(
                                      "day-cell",
                                      (!cell.in_month).then_some("outside"),
                                      cell.is_today.then_some("today"),
                                      past.then_some("past"),
                                      in_selection(cell.date).then_some("selected")
                                  )}>
                                      <span class="day-label">{ cell.date.day() }</span>
                                  </div>
                              }
                          }) }
                          <div class="bar-layer">
                              { for props.layout.row_bars(row).filter_map(|bar| {
                                  let task = by_id.get(&bar.segment.task_id)?;
                                  let color = props.config.color_for(task);
                                  Some(html! {
                                      <div
                                          key={format!("{}-{row}", task.id)}
                                          class={classes!(
                                              "task-bar",
                                              bar.segment.continues_before.then_some("continues-before"),
                                              bar.segment.continues_after.then_some("continues-after"),
                                              (props.resizing == Some(task.id)).then_some("resizing")
                                          )}
                                          data-task-id={task.id.to_string()}
                                          title={task.title.clone()}
                                          style={bar_style(bar, &color)}
                                      >
                                          { task.title.clone() }
                                      </div>
                                  })
                              }) }
                          </div>
                      </div>
                  }
              }) }
          </div>
      </>
  }
}
