fn local_storage()
-> Option<web_sys::Storage> {
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

fn load_app_config() -> AlmanacConfig {
  AlmanacConfig::from_toml_or_default(
    ALMANAC_CONFIG_TOML
  )
}

/// Task list mirrored into
/// `localStorage` on every write.
#[derive(Debug, Clone)]
struct LocalTaskStore {
  key:   String,
  tasks: Vec<Task>
}

impl LocalTaskStore {
  fn open(
    config: &AlmanacConfig,
    today: NaiveDate
  ) -> Self {
    let key = config.storage_key.clone();
    let stored =
      local_storage().and_then(|storage| {
        storage
          .get_item(&key)
          .ok()
          .flatten()
      });

    let mut store = Self {
      key,
      tasks: Vec::new()
    };

    match stored {
      | Some(raw) => {
        match decode_tasks(&raw) {
          | Ok(tasks) => {
            tracing::info!(
              count = tasks.len(),
              key = %store.key,
              "loaded tasks from local storage"
            );
            store.tasks = tasks;
          }
          | Err(error) => {
            tracing::error!(
              error = %format!("{error:#}"),
              "failed parsing stored tasks; \
               starting empty"
            );
          }
        }
      }
      | None if config.seed_demo_tasks => {
        tracing::info!(
          "no stored tasks; seeding demo \
           tasks"
        );
        store.set_tasks(seed_tasks(today));
      }
      | None => {}
    }

    store
  }

  fn persist(&self) {
    let Some(storage) = local_storage()
    else {
      tracing::warn!(
        "local storage unavailable; \
         tasks kept in memory only"
      );
      return;
    };

    match encode_tasks(&self.tasks) {
      | Ok(payload) => {
        if let Err(error) = storage
          .set_item(&self.key, &payload)
        {
          tracing::error!(
            ?error,
            "failed writing tasks to \
             local storage"
          );
        }
      }
      | Err(error) => {
        tracing::error!(
          error = %format!("{error:#}"),
          "failed encoding tasks"
        );
      }
    }
  }
}

impl TaskStore for LocalTaskStore {
  fn get_tasks(&self) -> &[Task] {
    &self.tasks
  }

  fn set_tasks(
    &mut self,
    tasks: Vec<Task>
  ) {
    self.tasks = tasks;
    self.persist();
  }
}
