use std::collections::BTreeMap;

use almanac_core::config::AlmanacConfig;
use almanac_core::datetime::{
  format_date,
  shift_months,
  shift_years
};
use almanac_core::edit::{
  EditOutcome,
  EditRequest,
  apply_edit
};
use almanac_core::filter::{
  TaskFilter,
  TimeWindow
};
use almanac_core::gesture::{
  BarHit,
  ClickTarget,
  GestureMachine,
  GestureOutcome,
  GridGeometry,
  PointerButton,
  PointerPress
};
use almanac_core::grid::{
  GRID_COLUMNS,
  MonthGrid,
  WEEKDAY_LABELS
};
use almanac_core::layout::{
  MonthLayout,
  PlacedBar,
  layout_month
};
use almanac_core::store::{
  TaskStore,
  decode_tasks,
  encode_tasks,
  seed_tasks
};
use almanac_core::task::{
  Category,
  Task,
  TaskId
};
use chrono::{
  Datelike,
  NaiveDate
};
use gloo::console::log;
use gloo::events::EventListener;
use uuid::Uuid;
use wasm_bindgen::JsCast;
use web_sys::{
  InputEvent,
  KeyboardEvent
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  NodeRef,
  Properties,
  TargetCast,
  UseStateHandle,
  classes,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_mut_ref,
  use_node_ref,
  use_state
};

const ALMANAC_CONFIG_TOML: &str =
  include_str!("../assets/almanac.toml");

include!("app/storage.rs");
include!("app/pointer.rs");
include!("app/view_components/calendar_header.rs");
include!("app/view_components/filter_panel.rs");
include!("app/view_components/month_grid.rs");
include!("app/view_components/task_modal.rs");

#[derive(Clone, PartialEq)]
struct ModalState {
  request:        EditRequest,
  draft_title:    String,
  draft_desc:     String,
  draft_category: Option<Category>,
  error:          Option<String>
}

impl ModalState {
  fn new(request: EditRequest) -> Self {
    let (draft_title, draft_desc, draft_category) =
      match &request {
        | EditRequest::Create { .. } => {
          (String::new(), String::new(), None)
        }
        | EditRequest::Edit(task) => (
          task.title.clone(),
          task
            .description
            .clone()
            .unwrap_or_default(),
          task.category
        )
      };

    Self {
      request,
      draft_title,
      draft_desc,
      draft_category,
      error: None
    }
  }

  fn outcome(&self) -> EditOutcome {
    EditOutcome::Submit {
      title:       self.draft_title.clone(),
      description: Some(
        self.draft_desc.clone()
      ),
      category:    self.draft_category
    }
  }
}

/// What the edit form should show after
/// a gesture, if anything.
fn modal_for_outcome(
  outcome: GestureOutcome,
  tasks: &[Task]
) -> Option<ModalState> {
  match outcome {
    | GestureOutcome::ProposeRange {
      start,
      end
    } => Some(ModalState::new(
      EditRequest::Create {
        start,
        end
      }
    )),
    | GestureOutcome::EditTask(id) => {
      tasks
        .iter()
        .find(|task| task.id == id)
        .cloned()
        .map(|task| {
          ModalState::new(EditRequest::Edit(
            task
          ))
        })
    }
    | GestureOutcome::Resized(id) => {
      ui_debug(
        "gesture.resized",
        &id.to_string()
      );
      None
    }
    | GestureOutcome::Nothing => None
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let config = use_state(load_app_config);
  let today = config.today();
  let focus = use_state(|| today);
  let store = {
    let config = (*config).clone();
    use_mut_ref(move || {
      LocalTaskStore::open(&config, today)
    })
  };
  let gesture =
    use_mut_ref(GestureMachine::new);
  let filter =
    use_state(TaskFilter::default);
  let modal_state =
    use_state(|| None::<ModalState>);
  let grid_ref = use_node_ref();
  let force_update = use_force_update();

  {
    use_effect_with((), move |_| {
      ui_debug(
        "app.mounted",
        "frontend mounted and hooks \
         initialized"
      );
      || ()
    });
  }

  // Moves and releases are tracked on the
  // window so a drag that leaves the grid
  // still ends.
  {
    let gesture = gesture.clone();
    let store = store.clone();
    let grid_ref = grid_ref.clone();
    let modal_state = modal_state.clone();
    let force_update = force_update.clone();
    use_effect_with(
      (*focus, today),
      move |(focus, today)| {
        let grid =
          MonthGrid::build(*focus, *today);
        let today = *today;

        let listeners =
          web_sys::window().map(|window| {
            let on_move = {
              let gesture = gesture.clone();
              let store = store.clone();
              let force_update =
                force_update.clone();
              let grid = grid.clone();
              EventListener::new(
                &window,
                "pointermove",
                move |event| {
                  if !gesture.borrow().is_active()
                  {
                    return;
                  }
                  let Some(event) = event
                    .dyn_ref::<web_sys::PointerEvent>()
                  else {
                    return;
                  };
                  let Some(geometry) =
                    measure_grid(&grid_ref)
                  else {
                    return;
                  };

                  let before =
                    gesture.borrow().state();
                  let next = gesture
                    .borrow_mut()
                    .pointer_move(
                      &grid,
                      &geometry,
                      f64::from(event.client_x()),
                      f64::from(event.client_y()),
                      store.borrow().get_tasks()
                    );
                  let changed = next.is_some()
                    || gesture.borrow().state()
                      != before;
                  if let Some(next) = next {
                    store
                      .borrow_mut()
                      .set_tasks(next);
                  }
                  if changed {
                    force_update.force_update();
                  }
                }
              )
            };

            let on_up = EventListener::new(
              &window,
              "pointerup",
              move |_event| {
                if !gesture.borrow().is_active()
                {
                  return;
                }
                let outcome = gesture
                  .borrow_mut()
                  .pointer_up(today);
                let opened = modal_for_outcome(
                  outcome,
                  store.borrow().get_tasks()
                );
                if opened.is_some() {
                  modal_state.set(opened);
                }
                force_update.force_update();
              }
            );

            (on_move, on_up)
          });

        move || drop(listeners)
      }
    );
  }

  let grid = MonthGrid::build(*focus, today);
  let all_count =
    store.borrow().get_tasks().len();
  let visible = filter
    .apply(store.borrow().get_tasks(), today);
  let layout = layout_month(&grid, &visible);

  let on_pointer_down = {
    let gesture = gesture.clone();
    let grid_ref = grid_ref.clone();
    let grid = grid.clone();
    let force_update = force_update.clone();
    Callback::from(
      move |e: web_sys::PointerEvent| {
        let Some(geometry) =
          measure_grid(&grid_ref)
        else {
          return;
        };
        let press = pointer_press(&e);
        if gesture.borrow_mut().pointer_down(
          &grid, &geometry, &press
        ) {
          e.prevent_default();
          force_update.force_update();
        }
      }
    )
  };

  let on_grid_click = {
    let gesture = gesture.clone();
    let store = store.clone();
    let grid_ref = grid_ref.clone();
    let grid = grid.clone();
    let modal_state = modal_state.clone();
    Callback::from(move |e: MouseEvent| {
      let Some(geometry) =
        measure_grid(&grid_ref)
      else {
        return;
      };
      let outcome =
        gesture.borrow_mut().click(
          &grid,
          &geometry,
          click_target(&e),
          today
        );
      let opened = modal_for_outcome(
        outcome,
        store.borrow().get_tasks()
      );
      if opened.is_some() {
        modal_state.set(opened);
      }
    })
  };

  let on_modal_submit = {
    let store = store.clone();
    let modal_state = modal_state.clone();
    let force_update = force_update.clone();
    Callback::from(move |state: ModalState| {
      let result = apply_edit(
        store.borrow().get_tasks(),
        &state.request,
        state.outcome()
      );
      match result {
        | Ok(next) => {
          store.borrow_mut().set_tasks(next);
          modal_state.set(None);
          force_update.force_update();
        }
        | Err(error) => {
          tracing::debug!(
            %error,
            "edit form rejected"
          );
          let mut state = state;
          state.error = Some(error.to_string());
          modal_state.set(Some(state));
        }
      }
    })
  };

  let on_modal_delete = {
    let store = store.clone();
    let modal_state = modal_state.clone();
    let force_update = force_update.clone();
    Callback::from(move |state: ModalState| {
      let result = apply_edit(
        store.borrow().get_tasks(),
        &state.request,
        EditOutcome::Delete
      );
      match result {
        | Ok(next) => {
          store.borrow_mut().set_tasks(next);
        }
        | Err(error) => {
          tracing::warn!(
            %error,
            "delete failed"
          );
        }
      }
      modal_state.set(None);
      force_update.force_update();
    })
  };

  let on_modal_close_click = {
    let modal_state = modal_state.clone();
    Callback::from(move |_: MouseEvent| {
      ui_debug(
        "button.cancel.click",
        "edit form closed"
      );
      modal_state.set(None);
    })
  };

  let shift = |months: i32, years: i32| {
    let focus = focus.clone();
    Callback::from(move |_: MouseEvent| {
      let next = shift_years(
        shift_months(*focus, months),
        years
      );
      focus.set(next);
    })
  };
  let on_today = {
    let focus = focus.clone();
    Callback::from(move |_: MouseEvent| {
      focus.set(today);
    })
  };

  let on_filter_change = {
    let filter = filter.clone();
    Callback::from(move |next: TaskFilter| {
      tracing::debug!(
        search = %next.search,
        categories = next.categories.len(),
        window = %next.window.as_key(),
        "filter changed"
      );
      filter.set(next);
    })
  };

  let selection = gesture.borrow().selection();
  let resizing = gesture.borrow().resizing_task();

  html! {
      <div class="almanac">
          <aside>
              <FilterPanel
                  filter={(*filter).clone()}
                  windows={config.time_windows()}
                  on_change={on_filter_change}
              />
              <div class="panel muted">
                  { format!("{} of {} tasks shown", visible.len(), all_count) }
              </div>
          </aside>
          <main class="panel">
              <CalendarHeader
                  title={grid.title()}
                  on_prev_year={shift(0, -1)}
                  on_prev_month={shift(-1, 0)}
                  on_today={on_today}
                  on_next_month={shift(1, 0)}
                  on_next_year={shift(0, 1)}
              />
              <MonthGridView
                  grid={grid.clone()}
                  layout={layout}
                  tasks={visible}
                  config={(*config).clone()}
                  selection={selection}
                  resizing={resizing}
                  grid_ref={grid_ref.clone()}
                  on_pointer_down={on_pointer_down}
                  on_click={on_grid_click}
              />
          </main>
          <TaskModal
              modal_state={modal_state.clone()}
              on_modal_submit={on_modal_submit}
              on_modal_delete={on_modal_delete}
              on_modal_close_click={on_modal_close_click}
          />
      </div>
  }
}

fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
