const BAR_ATTR: &str = "data-task-id";

/// Measures the rendered grid. Rows grow
/// with their lane count, so each row is
/// measured on its own.
fn measure_grid(
  grid_ref: &NodeRef
) -> Option<GridGeometry> {
  let element =
    grid_ref.cast::<web_sys::Element>()?;
  let bounds =
    element.get_bounding_client_rect();
  let children = element.children();

  let rows = (0..children.length())
    .filter_map(|idx| children.item(idx))
    .map(|row| {
      let rect =
        row.get_bounding_client_rect();
      (rect.top(), rect.bottom())
    })
    .collect::<Vec<_>>();

  if rows.is_empty() {
    return None;
  }

  Some(GridGeometry::from_row_bounds(
    bounds.left(),
    bounds.width(),
    rows
  ))
}

fn bar_element(
  event: &web_sys::Event
) -> Option<web_sys::Element> {
  event
    .target()?
    .dyn_into::<web_sys::Element>()
    .ok()?
    .closest(&format!("[{BAR_ATTR}]"))
    .ok()
    .flatten()
}

fn bar_task_id(
  element: &web_sys::Element
) -> Option<TaskId> {
  element
    .get_attribute(BAR_ATTR)
    .and_then(|raw| {
      Uuid::parse_str(&raw).ok()
    })
}

fn bar_hit(
  event: &web_sys::PointerEvent
) -> Option<BarHit> {
  let element = bar_element(event)?;
  let task_id = bar_task_id(&element)?;
  let rect =
    element.get_bounding_client_rect();

  Some(BarHit {
    task_id,
    offset_x: f64::from(event.client_x())
      - rect.left(),
    bar_width: rect.width()
  })
}

fn pointer_press(
  event: &web_sys::PointerEvent
) -> PointerPress {
  PointerPress {
    x:      f64::from(event.client_x()),
    y:      f64::from(event.client_y()),
    button: PointerButton::from_dom(
      event.button()
    ),
    bar:    bar_hit(event)
  }
}

fn click_target(
  event: &web_sys::MouseEvent
) -> ClickTarget {
  match bar_element(event)
    .as_ref()
    .and_then(bar_task_id)
  {
    | Some(task_id) => {
      ClickTarget::Bar(task_id)
    }
    | None => ClickTarget::Point {
      x: f64::from(event.client_x()),
      y: f64::from(event.client_y())
    }
  }
}
