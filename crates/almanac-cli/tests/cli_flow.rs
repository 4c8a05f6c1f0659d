use almanac_cli::cli::{Command, FilterArgs};
use almanac_cli::commands::{Session, dispatch};
use almanac_cli::datastore::DataStore;
use almanac_cli::render::{DEFAULT_CELL_WIDTH, Renderer};
use almanac_core::config::AlmanacConfig;
use almanac_core::store::TaskStore;
use almanac_core::task::Category;
use chrono::NaiveDate;
use tempfile::tempdir;

fn ymd(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
}

fn run(store: &mut DataStore, command: Command) -> anyhow::Result<String> {
    let config = AlmanacConfig::default();
    let mut out = Vec::new();
    {
        let mut session = Session {
            store,
            config: &config,
            renderer: Renderer::new(false),
            today: ymd(17),
            out: &mut out,
        };
        dispatch(&mut session, Some(command))?;
    }
    Ok(String::from_utf8(out).expect("utf8 output"))
}

#[test]
fn add_resize_edit_delete_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let mut store = DataStore::open(temp.path()).expect("open datastore");

    run(
        &mut store,
        Command::Add {
            title: "Ship release".to_string(),
            start: ymd(20),
            end: Some(ymd(23)),
            category: Some(Category::Work),
            description: None,
        },
    )
    .expect("add task");
    assert!(store.is_dirty());
    store.commit().expect("commit");

    let mut store = DataStore::open(temp.path()).expect("reopen datastore");
    assert_eq!(store.get_tasks().len(), 1);
    let id = store.get_tasks()[0].id.to_string();
    let prefix = id[..8].to_string();

    run(
        &mut store,
        Command::Resize {
            id: prefix.clone(),
            start: Some(ymd(18)),
            end: None,
        },
    )
    .expect("resize task");
    assert_eq!(store.get_tasks()[0].start, ymd(18));
    assert_eq!(store.get_tasks()[0].end, ymd(23));

    // start past the end is clamped
    run(
        &mut store,
        Command::Resize {
            id: prefix.clone(),
            start: Some(ymd(30)),
            end: None,
        },
    )
    .expect("clamped resize");
    assert_eq!(store.get_tasks()[0].start, ymd(23));

    run(
        &mut store,
        Command::Edit {
            id: prefix.clone(),
            title: Some("Ship v2".to_string()),
            category: None,
            description: Some("cut the branch".to_string()),
            no_category: false,
            clear_description: false,
        },
    )
    .expect("edit task");
    let task = &store.get_tasks()[0];
    assert_eq!(task.title, "Ship v2");
    assert_eq!(task.category, Some(Category::Work));
    assert_eq!(task.description.as_deref(), Some("cut the branch"));

    run(
        &mut store,
        Command::Edit {
            id: prefix.clone(),
            title: None,
            category: None,
            description: None,
            no_category: true,
            clear_description: true,
        },
    )
    .expect("clear task fields");
    let task = &store.get_tasks()[0];
    assert_eq!(task.title, "Ship v2");
    assert_eq!(task.category, None);
    assert_eq!(task.description, None);

    let listing = run(
        &mut store,
        Command::List {
            filter: FilterArgs {
                search: Some("ship".to_string()),
                ..FilterArgs::default()
            },
        },
    )
    .expect("list tasks");
    assert!(listing.contains("Ship v2"));

    run(&mut store, Command::Delete { id: prefix }).expect("delete task");
    assert!(store.get_tasks().is_empty());
}

#[test]
fn past_tasks_are_refused() {
    let temp = tempdir().expect("tempdir");
    let mut store = DataStore::open(temp.path()).expect("open datastore");

    let result = run(
        &mut store,
        Command::Add {
            title: "Yesterday".to_string(),
            start: ymd(16),
            end: None,
            category: None,
            description: None,
        },
    );
    assert!(result.is_err());
    assert!(store.get_tasks().is_empty());
    assert!(!store.is_dirty());
}

#[test]
fn month_view_renders_filtered_bars() {
    let temp = tempdir().expect("tempdir");
    let mut store = DataStore::open(temp.path()).expect("open datastore");

    for (title, category) in [("Alpha", Category::Work), ("Beta", Category::Personal)] {
        run(
            &mut store,
            Command::Add {
                title: title.to_string(),
                start: ymd(20),
                end: None,
                category: Some(category),
                description: None,
            },
        )
        .expect("add task");
    }

    let text = run(
        &mut store,
        Command::Month {
            date: None,
            cell_width: DEFAULT_CELL_WIDTH,
            filter: FilterArgs {
                categories: vec![Category::Personal],
                ..FilterArgs::default()
            },
        },
    )
    .expect("month view");

    assert!(text.contains("October 2026"));
    assert!(text.contains("[Beta"));
    assert!(!text.contains("Alpha"));
}

#[test]
fn huge_cell_width_renders_without_overflow() {
    let temp = tempdir().expect("tempdir");
    let mut store = DataStore::open(temp.path()).expect("open datastore");

    let text = run(
        &mut store,
        Command::Month {
            date: None,
            cell_width: usize::MAX / 2,
            filter: FilterArgs::default(),
        },
    )
    .expect("month view");
    assert!(text.contains("October 2026"));
}

#[test]
fn unknown_ids_are_errors() {
    let temp = tempdir().expect("tempdir");
    let mut store = DataStore::open(temp.path()).expect("open datastore");
    assert!(run(&mut store, Command::Delete { id: "ffff".to_string() }).is_err());
}
