use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{param_str, today};
use crate::ipc::types::{AppState, Request};
use crate::notify::{Permission, StdoutNotifier};
use crate::store::Store;
use crate::tracker::Tracker;
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(path) = param_str(&req.params, "path").map(PathBuf::from) else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match Store::open(&path) {
        Ok(store) => {
            // Opening loads persisted state best-effort and asks the UI to
            // sort out notification permission.
            let tracker = Tracker::open(store, Box::new(StdoutNotifier), today());
            log::info!(
                "workspace selected: {} ({} courses)",
                path.display(),
                tracker.courses().len()
            );
            let result = json!({
                "workspacePath": path.to_string_lossy(),
                "courseCount": tracker.courses().len(),
                "selectedCourseId": tracker.selected_course_id(),
            });
            state.workspace = Some(path);
            state.tracker = Some(tracker);
            ok(&req.id, result)
        }
        Err(e) => err(&req.id, "db_open_failed", format!("{e:?}"), None),
    }
}

fn handle_notify_permission(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(raw) = param_str(&req.params, "state") else {
        return err(&req.id, "bad_params", "missing state", None);
    };
    let Some(permission) = Permission::parse(raw) else {
        return err(
            &req.id,
            "bad_params",
            format!("unknown permission state: {raw}"),
            None,
        );
    };

    tracker.set_permission(permission, today());
    ok(&req.id, json!({ "state": raw }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "notify.permission" => Some(handle_notify_permission(state, req)),
        _ => None,
    }
}
