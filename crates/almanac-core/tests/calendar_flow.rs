use almanac_core::edit::{
  EditOutcome,
  EditRequest,
  apply_edit
};
use almanac_core::filter::TaskFilter;
use almanac_core::gesture::{
  BarHit,
  ClickTarget,
  GestureMachine,
  GestureOutcome,
  GridGeometry,
  PointerButton,
  PointerPress
};
use almanac_core::grid::MonthGrid;
use almanac_core::layout::layout_month;
use almanac_core::store::{
  MemoryStore,
  TaskStore,
  decode_tasks,
  encode_tasks
};
use almanac_core::task::{
  Category,
  Task
};
use chrono::NaiveDate;

fn ymd(
  m: u32,
  d: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, m, d)
    .expect("valid date")
}

struct Board {
  grid:     MonthGrid,
  geometry: GridGeometry,
  today:    NaiveDate
}

impl Board {
  fn october(today: NaiveDate) -> Self {
    Self {
      grid: MonthGrid::build(
        ymd(10, 1),
        today
      ),
      geometry: GridGeometry::uniform(
        10.0, 50.0, 700.0, 480.0
      ),
      today
    }
  }

  fn point(
    &self,
    date: NaiveDate
  ) -> (f64, f64) {
    let index = self
      .grid
      .index_of(date)
      .expect("date in grid");
    (
      10.0 + (index % 7) as f64 * 100.0 + 50.0,
      50.0 + (index / 7) as f64 * 80.0 + 40.0
    )
  }

  fn press(
    &self,
    date: NaiveDate,
    bar: Option<BarHit>
  ) -> PointerPress {
    let (x, y) = self.point(date);
    PointerPress {
      x,
      y,
      button: PointerButton::Primary,
      bar
    }
  }
}

#[test]
fn drag_create_then_name_the_task() {
  let board = Board::october(ymd(10, 17));
  let mut store = MemoryStore::default();
  let mut machine = GestureMachine::new();

  assert!(machine.pointer_down(
    &board.grid,
    &board.geometry,
    &board.press(ymd(10, 20), None)
  ));
  let (x, y) = board.point(ymd(10, 23));
  machine.pointer_move(
    &board.grid,
    &board.geometry,
    x,
    y,
    store.get_tasks()
  );

  let outcome = machine.pointer_up(board.today);
  let GestureOutcome::ProposeRange {
    start,
    end
  } = outcome
  else {
    panic!("expected a proposed range, got {outcome:?}");
  };
  assert_eq!((start, end), (ymd(10, 20), ymd(10, 23)));

  let request = EditRequest::Create {
    start,
    end
  };
  let next = apply_edit(
    store.get_tasks(),
    &request,
    EditOutcome::Submit {
      title:       "Ship release".to_string(),
      description: None,
      category:    Some(Category::Work)
    }
  )
  .expect("create task");
  store.set_tasks(next);

  let task = &store.get_tasks()[0];
  assert_eq!(task.title, "Ship release");
  assert_eq!(task.category, Some(Category::Work));
  assert_eq!(task.start, ymd(10, 20));
  assert_eq!(task.end, ymd(10, 23));

  // Tue 20 .. Fri 23 sits in one row
  let layout = layout_month(&board.grid, store.get_tasks());
  assert_eq!(layout.bars.len(), 1);
  assert_eq!(layout.bars[0].segment.row, 3);
}

#[test]
fn left_edge_drag_moves_start_only() {
  let board = Board::october(ymd(10, 5));
  let task = Task::new("Offsite", ymd(10, 14), ymd(10, 16))
    .expect("valid task");
  let mut store = MemoryStore::new(vec![task.clone()]);
  let mut machine = GestureMachine::new();

  let hit = BarHit {
    task_id:   task.id,
    offset_x:  12.0,
    bar_width: 300.0
  };
  assert!(machine.pointer_down(
    &board.grid,
    &board.geometry,
    &board.press(ymd(10, 14), Some(hit))
  ));

  for day in [13, 12, 9] {
    let (x, y) = board.point(ymd(10, day));
    if let Some(next) = machine.pointer_move(
      &board.grid,
      &board.geometry,
      x,
      y,
      store.get_tasks()
    ) {
      store.set_tasks(next);
    }
  }

  assert_eq!(
    machine.pointer_up(board.today),
    GestureOutcome::Resized(task.id)
  );
  let resized = &store.get_tasks()[0];
  assert_eq!(resized.start, ymd(10, 9));
  assert_eq!(resized.end, ymd(10, 16));

  // release click is not an edit
  assert_eq!(
    machine.click(
      &board.grid,
      &board.geometry,
      ClickTarget::Bar(task.id),
      board.today
    ),
    GestureOutcome::Nothing
  );
}

#[test]
fn gesture_in_the_past_creates_nothing() {
  let board = Board::october(ymd(10, 17));
  let mut machine = GestureMachine::new();

  machine.pointer_down(
    &board.grid,
    &board.geometry,
    &board.press(ymd(10, 2), None)
  );
  let (x, y) = board.point(ymd(10, 8));
  machine.pointer_move(&board.grid, &board.geometry, x, y, &[]);

  assert_eq!(
    machine.pointer_up(board.today),
    GestureOutcome::Nothing
  );
  assert!(!machine.is_active());
}

#[test]
fn filter_scenarios_and_persistence() {
  let tasks = vec![
    Task::new("Alpha", ymd(10, 20), ymd(10, 20))
      .expect("valid task")
      .with_category(Some(Category::Work)),
    Task::new("Beta", ymd(10, 21), ymd(10, 21))
      .expect("valid task")
      .with_category(Some(Category::Personal)),
  ];
  let today = ymd(10, 17);

  let search = TaskFilter {
    search: "al".to_string(),
    ..TaskFilter::default()
  };
  let only_alpha = search.apply(&tasks, today);
  assert_eq!(only_alpha.len(), 1);
  assert_eq!(only_alpha[0].title, "Alpha");
  assert_eq!(search.apply(&only_alpha, today), only_alpha);

  let mut personal = TaskFilter::default();
  personal.toggle_category(Category::Personal);
  let only_beta = personal.apply(&tasks, today);
  assert_eq!(only_beta.len(), 1);
  assert_eq!(only_beta[0].title, "Beta");

  let raw = encode_tasks(&tasks).expect("encode");
  assert_eq!(decode_tasks(&raw).expect("decode"), tasks);
}
