use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{param_str, today, tracker_err};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_courses_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_ref() else {
        return ok(&req.id, json!({ "courses": [], "selectedCourseId": null }));
    };

    // Include the derived values the dashboard renders next to each course.
    let courses: Vec<serde_json::Value> = tracker
        .courses()
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "title": c.title,
                "assignmentCount": c.assignments.len(),
                "progress": c.progress(),
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "courses": courses,
            "selectedCourseId": tracker.selected_course_id(),
        }),
    )
}

fn handle_courses_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(title) = param_str(&req.params, "title") else {
        return err(&req.id, "bad_params", "missing title", None);
    };

    match tracker.add_course(title, today()) {
        Ok(course_id) => ok(
            &req.id,
            json!({ "courseId": course_id, "title": title.trim() }),
        ),
        Err(e) => tracker_err(&req.id, &e),
    }
}

fn handle_courses_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(course_id) = param_str(&req.params, "courseId") else {
        return err(&req.id, "bad_params", "missing courseId", None);
    };
    let Some(title) = param_str(&req.params, "title") else {
        return err(&req.id, "bad_params", "missing title", None);
    };

    match tracker.rename_course(course_id, title, today()) {
        Ok(()) => ok(
            &req.id,
            json!({ "courseId": course_id, "title": title.trim() }),
        ),
        Err(e) => tracker_err(&req.id, &e),
    }
}

fn handle_courses_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(course_id) = param_str(&req.params, "courseId") else {
        return err(&req.id, "bad_params", "missing courseId", None);
    };

    match tracker.delete_course(course_id, today()) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => tracker_err(&req.id, &e),
    }
}

fn handle_courses_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(course_id) = param_str(&req.params, "courseId") else {
        return err(&req.id, "bad_params", "missing courseId", None);
    };

    match tracker.select_course(course_id, today()) {
        Ok(()) => ok(&req.id, json!({ "selectedCourseId": course_id })),
        Err(e) => tracker_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.list" => Some(handle_courses_list(state, req)),
        "courses.create" => Some(handle_courses_create(state, req)),
        "courses.update" => Some(handle_courses_update(state, req)),
        "courses.delete" => Some(handle_courses_delete(state, req)),
        "courses.select" => Some(handle_courses_select(state, req)),
        _ => None,
    }
}
