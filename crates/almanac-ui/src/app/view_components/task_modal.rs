#[derive(Properties, PartialEq)]
struct TaskModalProps {
  modal_state:
    UseStateHandle<Option<ModalState>>,
  on_modal_submit:
    Callback<ModalState>,
  on_modal_delete:
    Callback<ModalState>,
  on_modal_close_click:
    Callback<MouseEvent>
}

#[function_component(TaskModal)]
fn task_modal(
  props: &TaskModalProps
) -> Html {
  let modal_state =
    props.modal_state.clone();
  let Some(state) = (*modal_state).clone()
  else {
    return html! {};
  };

  let (start, end) = state.request.range();
  let range_label = if start == end {
    format_date(start)
  } else {
    format!(
      "{} to {}",
      format_date(start),
      format_date(end)
    )
  };
  let heading = if state.request.is_create()
  {
    "New task"
  } else {
    "Edit task"
  };

  let on_title_input = {
    let modal_state = modal_state.clone();
    Callback::from(move |e: InputEvent| {
      let input: web_sys::HtmlInputElement =
        e.target_unchecked_into();
      if let Some(mut current) =
        (*modal_state).clone()
      {
        current.draft_title = input.value();
        current.error = None;
        modal_state.set(Some(current));
      }
    })
  };
  let on_desc_input = {
    let modal_state = modal_state.clone();
    Callback::from(move |e: InputEvent| {
      let input: web_sys::HtmlTextAreaElement =
        e.target_unchecked_into();
      if let Some(mut current) =
        (*modal_state).clone()
      {
        current.draft_desc = input.value();
        modal_state.set(Some(current));
      }
    })
  };
  let on_category_change = {
    let modal_state = modal_state.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: web_sys::HtmlSelectElement =
          e.target_unchecked_into();
        if let Some(mut current) =
          (*modal_state).clone()
        {
          current.draft_category =
            Category::from_key(
              &select.value()
            );
          modal_state.set(Some(current));
        }
      }
    )
  };
  let on_save_click = {
    let on_modal_submit =
      props.on_modal_submit.clone();
    let state = state.clone();
    Callback::from(move |_: MouseEvent| {
      ui_debug(
        "button.save.click",
        "save click fired"
      );
      on_modal_submit.emit(state.clone());
    })
  };
  let on_title_keydown = {
    let on_modal_submit =
      props.on_modal_submit.clone();
    let state = state.clone();
    Callback::from(
      move |e: KeyboardEvent| {
        if e.key() == "Enter" {
          e.prevent_default();
          on_modal_submit
            .emit(state.clone());
        }
      }
    )
  };
  let on_delete_click = {
    let on_modal_delete =
      props.on_modal_delete.clone();
    let state = state.clone();
    Callback::from(move |_: MouseEvent| {
      on_modal_delete.emit(state.clone());
    })
  };

  html! {
      <div class="modal-backdrop">
          <div class="panel modal">
              <h3>{ heading }</h3>
              <div class="muted">{ range_label }</div>
              <label>
                  { "Title" }
                  <input
                      type="text"
                      value={state.draft_title.clone()}
                      oninput={on_title_input}
                      onkeydown={on_title_keydown}
                  />
              </label>
              <label>
                  { "Description" }
                  <textarea
                      value={state.draft_desc.clone()}
                      oninput={on_desc_input}
                  />
              </label>
              <label>
                  { "Category" }
                  <select onchange={on_category_change}>
                      <option value="" selected={state.draft_category.is_none()}>{ "None" }</option>
                      { for Category::ALL.into_iter().map(|category| html! {
                          <option
                              value={category.as_key()}
                              selected={state.draft_category == Some(category)}
                          >
                              { category.label() }
                          </option>
                      }) }
                  </select>
              </label>
              if let Some(error) = state.error.clone() {
                  <div class="error">{ error }</div>
              }
              <div class="actions">
                  if !state.request.is_create() {
                      <button class="btn danger" onclick={on_delete_click}>{ "Delete" }</button>
                  }
                  <button class="btn" onclick={props.on_modal_close_click.clone()}>{ "Cancel" }</button>
                  <button class="btn primary" onclick={on_save_click}>{ "Save" }</button>
              </div>
          </div>
      </div>
  }
}
