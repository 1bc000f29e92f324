//! The single HTML page.

use crate::{
  app::AppState, http::error::ApiError, models::todo::todo_item::TodoItem, util::html_escape,
};
use axum::{extract::State, response::Html};
use tracing::info;

pub async fn ui_index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
  info!("Home page accessed");
  let todos = state.store.list().await?;
  Ok(Html(TEMPLATE.replace("__ROWS__", &render_rows(&todos))))
}

/// Initial list markup; the page script re-renders it after every change.
fn render_rows(todos: &[TodoItem]) -> String {
  let mut rows = String::new();
  for t in todos {
    rows.push_str(&format!(
      "<li><label><input type=\"checkbox\"{checked} disabled /> <span class=\"todo-title{done}\">{title}</span></label></li>",
      checked = if t.completed { " checked" } else { "" },
      done = if t.completed { " done" } else { "" },
      title = html_escape(&t.title),
    ));
  }
  rows
}

const TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Todo App</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 36rem; }
    h1 { margin: 0 0 1rem 0; }
    .add { display: flex; gap: .5rem; margin-bottom: 1rem; }
    .add input { flex: 1; padding: .4rem; }
    ul { list-style: none; padding: 0; }
    li { display: flex; justify-content: space-between; align-items: center; border-bottom: 1px solid #ddd; padding: .5rem 0; }
    .todo-title.done { text-decoration: line-through; color: #888; }
    button.small { font-size: 12px; margin-left: .25rem; }
  </style>
</head>
<body>
  <h1>Todo App</h1>
  <div class="add">
    <input id="todoInput" placeholder="What needs doing?" onkeydown="if(event.key==='Enter')addTodo()" />
    <button onclick="addTodo()">Add</button>
  </div>
  <ul id="todoList">__ROWS__</ul>
  <script>
    const API = '/api/todos/';
    const send = (url, method, body) => fetch(url, {
      method,
      headers: { 'Content-Type': 'application/json' },
      body: body === undefined ? undefined : JSON.stringify(body),
    });

    async function loadTodos() {
      try {
        const res = await fetch(API);
        render(await res.json());
      } catch (err) {
        console.error('load failed', err);
      }
    }

    function render(todos) {
      const list = document.getElementById('todoList');
      list.replaceChildren(...todos.map(todo => {
        const li = document.createElement('li');
        const label = document.createElement('label');
        const box = document.createElement('input');
        box.type = 'checkbox';
        box.checked = todo.completed;
        box.onchange = () => save(todo.id, { title: todo.title, completed: !todo.completed });
        const title = document.createElement('span');
        title.className = 'todo-title' + (todo.completed ? ' done' : '');
        title.textContent = ' ' + todo.title;
        label.append(box, title);

        const edit = document.createElement('button');
        edit.className = 'small';
        edit.textContent = 'Edit';
        edit.onclick = () => {
          const next = prompt('Edit todo title:', todo.title);
          if (next === null) return;
          save(todo.id, { title: next.trim() || todo.title, completed: todo.completed });
        };
        const del = document.createElement('button');
        del.className = 'small';
        del.textContent = 'Delete';
        del.onclick = async () => {
          if (!confirm('Delete this todo?')) return;
          await send(API + todo.id, 'DELETE');
          loadTodos();
        };
        const actions = document.createElement('div');
        actions.append(edit, del);

        li.append(label, actions);
        return li;
      }));
    }

    async function save(id, body) {
      await send(API + id, 'PUT', body);
      loadTodos();
    }

    async function addTodo() {
      const input = document.getElementById('todoInput');
      const title = input.value.trim();
      if (!title) return;
      await send(API, 'POST', { title, completed: false });
      input.value = '';
      loadTodos();
    }

    window.addEventListener('load', loadTodos);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rows_escape_titles_and_mark_completed() {
    let rows = render_rows(&[
      TodoItem {
        id: 1,
        title: "<script>".into(),
        completed: false,
      },
      TodoItem {
        id: 2,
        title: "done".into(),
        completed: true,
      },
    ]);

    assert!(rows.contains("&lt;script&gt;"));
    assert!(!rows.contains("<script>"));
    assert!(rows.contains("todo-title done"));
    assert_eq!(rows.matches("<li>").count(), 2);
  }
}
