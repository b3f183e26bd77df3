//! `classroom demo`: drive a roster through a full release/work/grade cycle

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, ValueEnum};
use classroom_core::{
    Assignment, ClassroomConfig, ConsoleSink, Context, GradeSource, JsonLinesSink,
    NotificationSink, RandomGrades, Roster,
};
use serde::Serialize;
use tracing::info;

use crate::config::ConfigLoader;

#[derive(Args)]
pub struct DemoArgs {
    /// Student to enroll, as "Full Name:email" (repeatable)
    #[arg(
        long = "student",
        value_name = "NAME:EMAIL",
        value_parser = parse_student,
        default_values = ["John Lastname:John@uwo.ca", "Sporngle Gerfunkle:Sporngle@uwo.ca"]
    )]
    pub students: Vec<(String, String)>,

    /// Assignment to release (repeatable); student N starts assignment N
    #[arg(long = "assignment", value_name = "NAME", default_values = ["A1", "A2"])]
    pub assignments: Vec<String>,

    /// Delay before the final reminder for the first assignment
    #[arg(long, default_value_t = 200)]
    pub reminder_after_ms: u64,

    /// Seed for the grade generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the configured work delay
    #[arg(long)]
    pub work_delay_ms: Option<u64>,

    /// Override the configured grading delay
    #[arg(long)]
    pub grade_delay_ms: Option<u64>,

    /// Notification output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// "Observer → Name, A1 has been released." lines
    Text,
    /// One JSON object per line
    Json,
}

/// What the demo does, independent of where its output goes
#[derive(Debug, Clone)]
pub struct DemoPlan {
    pub students: Vec<(String, String)>,
    pub assignments: Vec<String>,
    pub reminder_after: Duration,
}

#[derive(Debug, Serialize)]
pub struct StudentSummary {
    pub name: String,
    pub email: String,
    pub overall_grade: Option<f64>,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Serialize)]
pub struct DemoSummary {
    pub students: Vec<StudentSummary>,
    pub outstanding: Vec<String>,
}

fn parse_student(value: &str) -> Result<(String, String), String> {
    let (name, email) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:EMAIL, got {value:?}"))?;
    let (name, email) = (name.trim(), email.trim());
    if name.is_empty() || email.is_empty() {
        return Err(format!("expected NAME:EMAIL, got {value:?}"));
    }
    Ok((name.to_string(), email.to_string()))
}

pub async fn run(args: DemoArgs) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(ms) = args.work_delay_ms {
        config.timing.work_delay_ms = ms;
    }
    if let Some(ms) = args.grade_delay_ms {
        config.timing.grade_delay_ms = ms;
    }

    let sink: Arc<dyn NotificationSink> = match args.format {
        OutputFormat::Text => Arc::new(ConsoleSink::stdout()),
        OutputFormat::Json => Arc::new(JsonLinesSink::stdout()),
    };
    let grades: Arc<dyn GradeSource> = match args.seed {
        Some(seed) => Arc::new(RandomGrades::seeded(seed)),
        None => Arc::new(RandomGrades::new()),
    };
    let ctx = Context::new().with_sink(sink).with_grades(grades);

    let plan = DemoPlan {
        students: args.students,
        assignments: args.assignments,
        reminder_after: Duration::from_millis(args.reminder_after_ms),
    };
    let summary = simulate(&plan, ctx, config).await?;

    match args.format {
        OutputFormat::Text => print!("{}", render_summary(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&summary)?),
    }
    Ok(())
}

/// Run the demo timeline to completion and collect the final state
pub async fn simulate(plan: &DemoPlan, ctx: Context, config: ClassroomConfig) -> Result<DemoSummary> {
    let Some(first) = plan.assignments.first() else {
        bail!("at least one assignment is required");
    };

    let roster = Roster::with_config(ctx.with_timing(config.timing), config.roster);
    for (name, email) in &plan.students {
        roster.enroll(name.as_str(), email.as_str()).await;
    }

    roster.release_all(plan.assignments.iter().cloned()).await?;

    let students = roster.students().await;
    for (student, assignment) in students.iter().zip(plan.assignments.iter().cycle()) {
        student.start_working(assignment).await;
    }

    tokio::time::sleep(plan.reminder_after).await;
    roster.send_reminder(first).await;

    let timeline = &roster.context().timeline;
    timeline.idle().await;
    timeline.shutdown();
    info!(students = students.len(), "Demo finished");

    let mut summaries = Vec::with_capacity(students.len());
    for student in &students {
        summaries.push(StudentSummary {
            name: student.full_name().await,
            email: student.email().await,
            overall_grade: student.grade().await,
            assignments: student.assignments().await,
        });
    }

    Ok(DemoSummary {
        students: summaries,
        outstanding: roster.outstanding_names(None).await,
    })
}

fn render_summary(summary: &DemoSummary) -> String {
    let mut out = String::from("\nSummary:\n");
    for student in &summary.students {
        let overall = match student.overall_grade {
            Some(grade) => format!("{grade:.1}"),
            None => "-".to_string(),
        };
        let _ = writeln!(out, "  {} <{}> overall {}", student.name, student.email, overall);
        for assignment in &student.assignments {
            match assignment.grade() {
                Some(grade) => {
                    let _ = writeln!(out, "    {}: {} ({})", assignment.name(), assignment.status(), grade);
                }
                None => {
                    let _ = writeln!(out, "    {}: {}", assignment.name(), assignment.status());
                }
            }
        }
    }
    if summary.outstanding.is_empty() {
        out.push_str("Outstanding: none\n");
    } else {
        let _ = writeln!(out, "Outstanding: {}", summary.outstanding.join(", "));
    }
    out
}
