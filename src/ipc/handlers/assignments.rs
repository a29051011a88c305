use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{param_str, parse_due_date, parse_status, today, tracker_err};
use crate::ipc::types::{AppState, Request};
use crate::model::AssignmentStatus;
use crate::tracker::AssignmentPatch;
use serde_json::json;

fn handle_assignments_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(course_id) = param_str(&req.params, "courseId") else {
        return err(&req.id, "bad_params", "missing courseId", None);
    };
    let Some(course) = tracker.courses().iter().find(|c| c.id == course_id) else {
        return err(
            &req.id,
            "not_found",
            format!("course not found: {course_id}"),
            None,
        );
    };

    let reference = today();
    let assignments: Vec<serde_json::Value> = course
        .assignments
        .iter()
        .map(|a| {
            json!({
                "id": a.id,
                "title": a.title,
                "dueDate": a.due_date,
                "status": a.status,
                "dueBand": a.due_band(reference),
            })
        })
        .collect();

    ok(&req.id, json!({ "assignments": assignments }))
}

fn handle_assignments_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(course_id) = param_str(&req.params, "courseId") else {
        return err(&req.id, "bad_params", "missing courseId", None);
    };
    let Some(title) = param_str(&req.params, "title") else {
        return err(&req.id, "bad_params", "missing title", None);
    };
    let Some(raw_due) = param_str(&req.params, "dueDate") else {
        return err(&req.id, "bad_params", "missing dueDate", None);
    };
    let Some(due_date) = parse_due_date(raw_due) else {
        return err(
            &req.id,
            "bad_params",
            format!("invalid dueDate: {raw_due}"),
            None,
        );
    };
    let status = match parse_status(&req.params, "status") {
        Ok(v) => v.unwrap_or(AssignmentStatus::NotStarted),
        Err(message) => return err(&req.id, "bad_params", message, None),
    };

    match tracker.add_assignment(course_id, title, due_date, status, today()) {
        Ok(assignment_id) => ok(
            &req.id,
            json!({ "assignmentId": assignment_id, "courseId": course_id }),
        ),
        Err(e) => tracker_err(&req.id, &e),
    }
}

fn handle_assignments_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(course_id) = param_str(&req.params, "courseId") else {
        return err(&req.id, "bad_params", "missing courseId", None);
    };
    let Some(assignment_id) = param_str(&req.params, "assignmentId") else {
        return err(&req.id, "bad_params", "missing assignmentId", None);
    };

    let due_date = match param_str(&req.params, "dueDate") {
        Some(raw) => match parse_due_date(raw) {
            Some(d) => Some(d),
            None => {
                return err(&req.id, "bad_params", format!("invalid dueDate: {raw}"), None)
            }
        },
        None => None,
    };
    let status = match parse_status(&req.params, "status") {
        Ok(v) => v,
        Err(message) => return err(&req.id, "bad_params", message, None),
    };
    let patch = AssignmentPatch {
        title: param_str(&req.params, "title").map(str::to_string),
        due_date,
        status,
    };

    match tracker.update_assignment(course_id, assignment_id, patch, today()) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => tracker_err(&req.id, &e),
    }
}

fn handle_assignments_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(course_id) = param_str(&req.params, "courseId") else {
        return err(&req.id, "bad_params", "missing courseId", None);
    };
    let Some(assignment_id) = param_str(&req.params, "assignmentId") else {
        return err(&req.id, "bad_params", "missing assignmentId", None);
    };

    match tracker.delete_assignment(course_id, assignment_id, today()) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => tracker_err(&req.id, &e),
    }
}

fn handle_assignments_set_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(tracker) = state.tracker.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let Some(course_id) = param_str(&req.params, "courseId") else {
        return err(&req.id, "bad_params", "missing courseId", None);
    };
    let Some(assignment_id) = param_str(&req.params, "assignmentId") else {
        return err(&req.id, "bad_params", "missing assignmentId", None);
    };
    let status = match parse_status(&req.params, "status") {
        Ok(Some(s)) => s,
        Ok(None) => return err(&req.id, "bad_params", "missing status", None),
        Err(message) => return err(&req.id, "bad_params", message, None),
    };

    match tracker.set_assignment_status(course_id, assignment_id, status, today()) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => tracker_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assignments.list" => Some(handle_assignments_list(state, req)),
        "assignments.create" => Some(handle_assignments_create(state, req)),
        "assignments.update" => Some(handle_assignments_update(state, req)),
        "assignments.delete" => Some(handle_assignments_delete(state, req)),
        "assignments.setStatus" => Some(handle_assignments_set_status(state, req)),
        _ => None,
    }
}
