//! Example consumer: an admin server exposing two in-memory modules.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Then: `curl localhost:8080/api/admin/schemas`

use admin_sdk::{
    admin_app, init_tracing, AppState, Config, CrudProvider, Field, FieldType, MemoryProvider,
    Registry, Schema,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

fn users() -> Schema {
    Schema::new("users", "Users")
        .field(Field::new("id", FieldType::String, "ID").readonly())
        .field(Field::new("email", FieldType::String, "Email Address").required().immutable())
        .field(Field::new("name", FieldType::String, "Full Name").required())
        .field(Field::enumeration("role", "Role", ["admin", "editor", "viewer"]).required())
        .field(Field::new("active", FieldType::Boolean, "Active"))
        .field(Field::new("created_at", FieldType::Date, "Created").readonly())
        .filterable(["role", "active", "created_at"])
        .searchable(["email", "name"])
}

fn todos() -> Schema {
    Schema::new("todos", "Todos")
        .field(Field::new("id", FieldType::String, "ID").readonly())
        .field(Field::new("title", FieldType::String, "Title").required())
        .field(Field::new("done", FieldType::Boolean, "Done"))
        .field(Field::new("priority", FieldType::Number, "Priority"))
        .field(Field::new("due", FieldType::Date, "Due Date"))
        .field(Field::new("created_at", FieldType::Date, "Created").readonly())
        .field(Field::new("updated_at", FieldType::Date, "Updated").readonly())
        .filterable(["done", "priority", "due"])
        .searchable(["title"])
}

async fn seed(todos: &MemoryProvider) -> Result<(), admin_sdk::AppError> {
    for (title, priority) in [("Write release notes", 2), ("Rotate API keys", 1)] {
        let payload = json!({ "title": title, "priority": priority, "done": false });
        if let serde_json::Value::Object(data) = payload {
            todos.create(data).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("admin_sdk=info,example_consumer=info,tower_http=info");
    let config = Config::load()?;

    let todo_store = Arc::new(MemoryProvider::new(todos())?);
    seed(&todo_store).await?;

    let mut registry = Registry::new();
    registry.register(Arc::new(MemoryProvider::new(users())?))?;
    registry.register(todo_store)?;

    let addr = config.server.bind_addr();
    let app = admin_app(AppState::new(registry, config), "/api/admin")?;
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("admin server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
