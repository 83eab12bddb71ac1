use super::common::*;

use crate::accounts::{Identity, Role};
use crate::applications::ApplicationStatus;
use crate::error::ServiceError;
use crate::query::Filter;
use crate::store::{Collection, ObjectId};

#[test]
fn apply_creates_a_pending_application() {
    let board = board();
    let seeker = applicant();

    let application = board
        .service
        .apply_to_job(&seeker, submission_for(&board.job))
        .expect("applied");

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.applicant_id, seeker.user_id);
    assert_eq!(application.recruiter_id, board.recruiter.user_id);
    assert_eq!(application.date_of_application, application.created_at);
}

#[test]
fn duplicate_apply_is_a_conflict_and_stores_one_record() {
    let board = board();
    let seeker = applicant();
    board
        .service
        .apply_to_job(&seeker, submission_for(&board.job))
        .expect("first application");

    match board
        .service
        .apply_to_job(&seeker, submission_for(&board.job))
    {
        Err(ServiceError::Conflict(message)) => {
            assert_eq!(message, "You have already applied for this job")
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    let stored = board
        .applications
        .count(
            &Filter::default()
                .with_equal("applicantId", seeker.user_id.to_hex())
                .with_equal("jobId", board.job.id.to_hex()),
        )
        .expect("count");
    assert_eq!(stored, 1);
}

#[test]
fn simultaneous_applies_store_one_record() {
    use std::sync::{Arc, Barrier};
    use std::thread;

    for _ in 0..50 {
        let board = board();
        let seeker = applicant();
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&board.service);
                let barrier = Arc::clone(&barrier);
                let submission = submission_for(&board.job);
                thread::spawn(move || {
                    barrier.wait();
                    service.apply_to_job(&seeker, submission).is_ok()
                })
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .filter(|ok| *ok)
            .count();
        assert_eq!(accepted, 1);

        let stored = board
            .applications
            .count(&Filter::default().with_equal("jobId", board.job.id.to_hex()))
            .expect("count");
        assert_eq!(stored, 1);
    }
}

#[test]
fn apply_validates_ids_and_job_ownership() {
    let board = board();
    let seeker = applicant();

    let mut malformed = submission_for(&board.job);
    malformed.job_id = "xyz".to_string();
    assert!(matches!(
        board.service.apply_to_job(&seeker, malformed),
        Err(ServiceError::Validation(message)) if message == "Valid job ID is required"
    ));

    let mut missing = submission_for(&board.job);
    missing.job_id = ObjectId::new().to_hex();
    assert!(matches!(
        board.service.apply_to_job(&seeker, missing),
        Err(ServiceError::NotFound(_))
    ));

    let mut wrong_recruiter = submission_for(&board.job);
    wrong_recruiter.recruiter_id = ObjectId::new().to_hex();
    assert!(matches!(
        board.service.apply_to_job(&seeker, wrong_recruiter),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn owning_recruiter_can_decide_and_reverse() {
    let board = board();
    let application = board
        .service
        .apply_to_job(&applicant(), submission_for(&board.job))
        .expect("applied");
    let id = application.id.to_hex();

    let accepted = board
        .service
        .update_status(&board.recruiter, &id, "accepted")
        .expect("accept");
    assert_eq!(accepted.status, ApplicationStatus::Accepted);

    let rejected = board
        .service
        .update_status(&board.recruiter, &id, "rejected")
        .expect("reverse");
    assert_eq!(rejected.status, ApplicationStatus::Rejected);

    assert!(matches!(
        board.service.update_status(&board.recruiter, &id, "pending"),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn foreign_recruiter_is_forbidden_and_status_is_unchanged() {
    let board = board();
    let application = board
        .service
        .apply_to_job(&applicant(), submission_for(&board.job))
        .expect("applied");
    let stranger = Identity::new(ObjectId::new(), Role::Recruiter);

    match board
        .service
        .update_status(&stranger, &application.id.to_hex(), "accepted")
    {
        Err(ServiceError::Forbidden(message)) => {
            assert_eq!(message, "Unauthorized user to update job")
        }
        other => panic!("expected forbidden, got {other:?}"),
    }

    let stored = board
        .applications
        .get(&application.id)
        .expect("get")
        .expect("still stored");
    assert_eq!(stored.status, ApplicationStatus::Pending);
}

#[test]
fn unknown_application_is_not_found() {
    let board = board();
    assert!(matches!(
        board
            .service
            .update_status(&board.recruiter, &ObjectId::new().to_hex(), "accepted"),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn applicant_listing_is_paginated_and_populated() {
    let board = board();
    let seeker = applicant();
    for n in 0..7 {
        let job = post_job(&board.jobs, &board.recruiter, "Abcorp", &format!("Role {n}"));
        board
            .service
            .apply_to_job(&seeker, submission_for(&job))
            .expect("applied");
    }
    board
        .service
        .apply_to_job(&applicant(), submission_for(&board.job))
        .expect("someone else applied");

    let page = board
        .service
        .applicant_jobs(&seeker, &params(&[("page", "2"), ("limit", "5")]))
        .expect("listing");

    assert_eq!(page.total_count, 7);
    assert_eq!(page.page_count, 2);
    assert_eq!(page.result.len(), 2);
    for record in &page.result {
        assert_eq!(record["applicantId"], seeker.user_id.to_hex());
        assert_eq!(record["jobId"]["company"], "Abcorp");
    }
}

#[test]
fn applicant_listing_filters_on_status() {
    let board = board();
    let seeker = applicant();
    let application = board
        .service
        .apply_to_job(&seeker, submission_for(&board.job))
        .expect("applied");
    let second_job = post_job(&board.jobs, &board.recruiter, "Abcorp", "Designer");
    board
        .service
        .apply_to_job(&seeker, submission_for(&second_job))
        .expect("applied");
    board
        .service
        .update_status(&board.recruiter, &application.id.to_hex(), "accepted")
        .expect("accept");

    let page = board
        .service
        .applicant_jobs(&seeker, &params(&[("status", "accepted")]))
        .expect("listing");
    assert_eq!(page.total_count, 1);
    assert_eq!(page.result[0]["id"], application.id.to_hex());
}

#[test]
fn recruiter_listing_is_newest_first_and_empty_is_not_found() {
    let board = board();
    assert!(matches!(
        board.service.recruiter_jobs(&board.recruiter, None),
        Err(ServiceError::NotFound(message)) if message == "No Job Found"
    ));

    let first = board
        .service
        .apply_to_job(&applicant(), submission_for(&board.job))
        .expect("applied");
    let second = board
        .service
        .apply_to_job(&applicant(), submission_for(&board.job))
        .expect("applied");
    backdate(&board.applications, &first, 2);

    let received = board
        .service
        .recruiter_jobs(&board.recruiter, None)
        .expect("received");
    let ids: Vec<&str> = received
        .iter()
        .map(|record| record["id"].as_str().unwrap_or_default())
        .collect();
    let expected = [second.id.to_hex(), first.id.to_hex()];
    assert_eq!(ids, vec![expected[0].as_str(), expected[1].as_str()]);
    assert_eq!(received[0]["jobId"]["position"], "Engineer");
}
