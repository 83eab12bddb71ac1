use crate::infra::{BoardServices, BoardStore};
use chrono::Duration;
use clap::Args;
use job_board::accounts::{Identity, RegisterRequest, TokenAuthority, User};
use job_board::applications::ApplicationSubmission;
use job_board::error::AppError;
use job_board::jobs::JobDraft;
use std::collections::HashMap;
use std::sync::Arc;

const COMPANIES: [&str; 4] = ["Abcorp", "Northwind", "Globex", "Initech"];
const POSITIONS: [&str; 4] = ["Backend Engineer", "Data Analyst", "Designer", "Support Lead"];
const LOCATIONS: [&str; 3] = ["Remote", "Lagos", "Berlin"];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of job postings to seed.
    #[arg(long, default_value_t = 12)]
    pub(crate) jobs: usize,
    /// Listing page to print.
    #[arg(long, default_value_t = 2)]
    pub(crate) page: u32,
    /// Listing page size.
    #[arg(long, default_value_t = 5)]
    pub(crate) limit: u32,
    /// Optional free-text search applied to the listing.
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Listing order: newest, oldest, a-z or z-a.
    #[arg(long, default_value = "oldest")]
    pub(crate) sort: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = BoardStore::default();
    let tokens = Arc::new(TokenAuthority::new("job-board-demo", Duration::hours(1)));
    let services = BoardServices::new(&store, tokens, "admin@jobboard.local");

    let recruiter = identity(&services.accounts.register(registration(
        "Rita Recruiter",
        "rita@jobboard.demo",
        Some("recruiter"),
    ))?);
    let seeker = identity(&services.accounts.register(registration(
        "Sam Seeker",
        "sam@jobboard.demo",
        None,
    ))?);

    let mut posted = Vec::with_capacity(args.jobs);
    for n in 0..args.jobs {
        let draft = JobDraft {
            company: COMPANIES[n % COMPANIES.len()].to_string(),
            position: format!("{} {:02}", POSITIONS[n % POSITIONS.len()], n + 1),
            job_type: if n % 3 == 0 { "contract" } else { "full-time" }.to_string(),
            job_location: LOCATIONS[n % LOCATIONS.len()].to_string(),
            job_status: "open".to_string(),
            job_skills: vec!["communication".to_string()],
            ..JobDraft::default()
        };
        posted.push(services.jobs.create(&recruiter, draft)?);
    }

    println!("Job board demo");
    println!("Seeded {} jobs for recruiter {}", posted.len(), recruiter.user_id);

    let mut params = HashMap::new();
    params.insert("page".to_string(), args.page.to_string());
    params.insert("limit".to_string(), args.limit.to_string());
    params.insert("sort".to_string(), args.sort.clone());
    if let Some(search) = &args.search {
        params.insert("search".to_string(), search.clone());
    }

    println!("\nListing (sort={}, page={}, limit={})", args.sort, args.page, args.limit);
    match services.jobs.list(&params) {
        Ok(page) => {
            println!(
                "  Page {} of {} ({} matching jobs)",
                page.current_page.unwrap_or(1),
                page.page_count,
                page.total_count
            );
            for job in &page.result {
                println!(
                    "  - {} at {} [{}]",
                    job["position"].as_str().unwrap_or_default(),
                    job["company"].as_str().unwrap_or_default(),
                    job["jobLocation"].as_str().unwrap_or_default(),
                );
            }
        }
        Err(err) => println!("  Listing unavailable: {}", err),
    }

    let Some(target) = posted.first() else {
        println!("\nNo jobs seeded; skipping the application walk-through");
        return Ok(());
    };

    println!("\nApplication walk-through for {} at {}", target.position, target.company);
    let submission = || ApplicationSubmission {
        recruiter_id: target.created_by.to_hex(),
        job_id: target.id.to_hex(),
        resume: Some("https://cv.jobboard.demo/sam.pdf".to_string()),
    };
    let application = services.applications.apply_to_job(&seeker, submission())?;
    println!("  Submitted: {} ({})", application.id, application.status.label());

    match services.applications.apply_to_job(&seeker, submission()) {
        Ok(_) => println!("  Second submission unexpectedly accepted"),
        Err(err) => println!("  Second submission refused: {}", err),
    }

    match services
        .applications
        .update_status(&seeker, &application.id.to_hex(), "accepted")
    {
        Ok(_) => println!("  Applicant changed their own status unexpectedly"),
        Err(err) => println!("  Applicant cannot decide: {}", err),
    }

    for decision in ["accepted", "rejected"] {
        let updated =
            services
                .applications
                .update_status(&recruiter, &application.id.to_hex(), decision)?;
        println!("  Recruiter set status: {}", updated.status.label());
    }

    let outcome = services.jobs.delete(&recruiter, &target.id.to_hex())?;
    println!(
        "\nDeleted {} with {} application(s)",
        outcome.job.position, outcome.applications_removed
    );

    Ok(())
}

fn registration(full_name: &str, email: &str, role: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        full_name: full_name.to_string(),
        email: email.to_string(),
        password: "demo-password".to_string(),
        role: role.map(str::to_string),
        location: None,
        gender: None,
    }
}

fn identity(user: &User) -> Identity {
    Identity::new(user.id, user.role)
}
