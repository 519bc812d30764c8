//! inspectctl - command-line client for the inspection API

use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inspection_checklist::{
    config::ConnectionArgs, template, AgendaProjector, Answer, ClientConfig, ClientId,
    ComplianceSummary, CreateReportInput, DateRange, HttpBackend, InspectorId, ItemId, Report,
    ReportId, ReportQuery, ReportService, ReportStatus, Schedule, TracingNotifier,
};

#[derive(Parser, Debug)]
#[command(name = "inspectctl")]
#[command(about = "Food-safety inspection reports from the command line")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the checklist template new reports are seeded from
    Template,

    /// Create a report from the template
    Create {
        #[arg(long)]
        description: String,
        #[arg(long)]
        client: i64,
        #[arg(long)]
        inspector: i64,
        /// Free-text category, e.g. "Restaurante"
        #[arg(long)]
        category: Option<String>,
        /// Scheduled time: local wall clock (2025-03-15T09:30) or RFC 3339 with an offset
        #[arg(long, value_parser = parse_when)]
        scheduled: Option<Schedule>,
    },

    /// List reports, optionally for one client or status
    List {
        #[arg(long)]
        client: Option<i64>,
        /// em_andamento or concluido
        #[arg(long, value_parser = parse_status)]
        status: Option<ReportStatus>,
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Show a report with its checklist and compliance summary
    Show { report: i64 },

    /// Record an answer: conforme, nao_conforme or na
    Answer {
        report: i64,
        item: i64,
        #[arg(value_parser = parse_answer)]
        answer: Answer,
    },

    /// Replace an item's notes
    Note { report: i64, item: i64, text: String },

    /// Finalize a report; it can no longer be edited
    Finalize { report: i64 },

    Delete { report: i64 },

    /// Reports scheduled in a month, grouped by day
    Agenda {
        /// Defaults to the current month
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only list this day of the month
        #[arg(long)]
        day: Option<u32>,
    },

    /// Download the PDF export of a report
    Pdf {
        report: i64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List client establishments
    Clients {
        #[arg(long)]
        search: Option<String>,
    },

    /// List users that can be made responsible for an inspection
    Inspectors,
}

fn parse_answer(raw: &str) -> Result<Answer, String> {
    match Answer::from_wire(raw) {
        Some(answer) if answer.is_set() => Ok(answer),
        _ => Err(format!("'{}' is not one of conforme, nao_conforme, na", raw)),
    }
}

fn parse_status(raw: &str) -> Result<ReportStatus, String> {
    [ReportStatus::InProgress, ReportStatus::Finalized]
        .into_iter()
        .find(|status| status.wire_value() == raw)
        .ok_or_else(|| format!("'{}' is not one of em_andamento, concluido", raw))
}

fn parse_when(raw: &str) -> Result<Schedule, String> {
    Schedule::parse(raw).ok_or_else(|| format!("'{}' is not a valid timestamp", raw))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_report(report: &Report) {
    let client = report
        .client
        .as_ref()
        .map(|c| c.trade_name.as_str())
        .unwrap_or("-");
    println!("#{} {} [{}]", report.id, report.description, report.status.label());
    println!("Client: {} ({})", client, report.client_id);
    if let Some(label) = &report.category_label {
        println!("Category: {}", label);
    }
    if let Some(at) = report.scheduled_at {
        println!("Scheduled: {}", at.in_timezone(&Local).format("%d/%m/%Y %H:%M"));
    }
    for category in &report.categories {
        println!();
        println!("{}. {}", category.order, category.name);
        for item in &category.items {
            println!("  [{:>13}] {} (item {}) {}", item.answer.label(), item.code, item.id, item.description);
            if !item.notes.is_empty() {
                println!("                  notes: {}", item.notes);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    let level = &cli.connection.log_level;
                    format!("inspection_checklist={level},inspectctl={level}").into()
                }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from(&cli.connection);
    debug!(api = %config.base_url, authenticated = config.token.is_some(), "Connecting");

    let backend = HttpBackend::from_config(&config).context("building HTTP client")?;
    let service = ReportService::new(backend, TracingNotifier, config.session());

    match cli.command {
        Command::Template => {
            if cli.json {
                return print_json(&template::template());
            }
            println!("Template {} ({} items)", template::TEMPLATE_VERSION, template::item_count());
            for category in template::template() {
                println!();
                println!("{}. {}", category.order, category.name);
                for item in category.items {
                    println!("  {} {}", item.code, item.description);
                }
            }
        }

        Command::Create {
            description,
            client,
            inspector,
            category,
            scheduled,
        } => {
            let mut input = CreateReportInput::new(description, ClientId(client), InspectorId(inspector));
            if let Some(label) = category {
                input = input.with_category_label(label);
            }
            if let Some(at) = scheduled {
                input = input.with_scheduled_at(at);
            }
            let report = service.create_report(input).await?;
            if cli.json {
                return print_json(&report);
            }
            println!("Created report #{} with {} items", report.id, report.item_count());
        }

        Command::List {
            client,
            status,
            skip,
            limit,
        } => {
            let mut query = ReportQuery::new().page(skip, limit);
            if let Some(client) = client {
                query = query.for_client(ClientId(client));
            }
            if let Some(status) = status {
                query = query.with_status(status);
            }
            let reports = service.list_reports(&query).await?;
            if cli.json {
                return print_json(&reports);
            }
            for report in &reports {
                let client = report
                    .client
                    .as_ref()
                    .map(|c| c.trade_name.as_str())
                    .unwrap_or("-");
                println!("{:>6}  {} - {} [{}]", report.id.0, client, report.description, report.status.label());
            }
        }

        Command::Show { report } => {
            let report = service.open_report(ReportId(report)).await?;
            let summary = ComplianceSummary::of(&report);
            if cli.json {
                return print_json(&serde_json::json!({ "report": report, "summary": summary }));
            }
            print_report(&report);
            println!();
            println!("{}", summary);
        }

        Command::Answer { report, item, answer } => {
            service.open_report(ReportId(report)).await?;
            let item = service.set_answer(ItemId(item), answer).await?;
            if cli.json {
                return print_json(&item);
            }
            println!("{} {}", item.code, item.answer.label());
        }

        Command::Note { report, item, text } => {
            service.open_report(ReportId(report)).await?;
            let item = service.set_notes(ItemId(item), text).await?;
            if cli.json {
                return print_json(&item);
            }
            println!("{} notes updated", item.code);
        }

        Command::Finalize { report } => {
            let report = service.finalize(ReportId(report)).await?;
            if cli.json {
                return print_json(&report);
            }
            let summary = ComplianceSummary::of(&report);
            println!("Report #{} finalized ({} of {} items answered)", report.id, summary.answered(), summary.total);
        }

        Command::Delete { report } => {
            service.delete_report(ReportId(report)).await?;
            println!("Report #{} deleted", report);
        }

        Command::Agenda {
            month,
            year,
            from,
            to,
            day,
        } => {
            let today = Local::now().date_naive();
            let month = month.unwrap_or(today.month());
            let year = year.unwrap_or(today.year());
            let filter = match (from, to) {
                (Some(start), Some(end)) if start > end => bail!("--from must not be after --to"),
                (Some(start), Some(end)) => Some(DateRange::new(start, end)),
                (Some(start), None) => Some(DateRange::from(start)),
                (None, Some(end)) => Some(DateRange::until(end)),
                (None, None) => None,
            };

            let reports = service.month_reports(month, year).await?;
            info!(month, year, listed = reports.len(), "Month loaded");
            let projector = AgendaProjector::local();

            if let Some(day) = day {
                let on_day = projector.reports_for_day(day, month, year, &reports, filter.as_ref());
                if cli.json {
                    return print_json(&on_day);
                }
                for report in on_day {
                    print_agenda_line(&projector, report);
                }
                return Ok(());
            }

            let agenda = projector.month_agenda(month, year, &reports, filter.as_ref());
            if cli.json {
                return print_json(&agenda);
            }
            println!("{:02}/{} - {} scheduled", month, year, agenda.scheduled_count());
            for bucket in agenda.busy_days() {
                println!();
                println!("Day {}", bucket.day);
                for report in &bucket.reports {
                    print_agenda_line(&projector, report);
                }
            }
        }

        Command::Pdf { report, output } => {
            let pdf = service.export_pdf(ReportId(report)).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(format!("relatorio_{}.pdf", report)));
            std::fs::write(&path, &pdf).with_context(|| format!("writing {}", path.display()))?;
            println!("Saved {} ({} bytes)", path.display(), pdf.len());
        }

        Command::Clients { search } => {
            let clients = service.clients(search.as_deref()).await?;
            if cli.json {
                return print_json(&clients);
            }
            for client in clients {
                println!("{:>6}  {}", client.id.0, client.display_name);
            }
        }

        Command::Inspectors => {
            let inspectors = service.inspectors().await?;
            if cli.json {
                return print_json(&inspectors);
            }
            for inspector in inspectors {
                println!("{:>6}  {} ({})", inspector.id.0, inspector.name, inspector.role);
            }
        }
    }

    Ok(())
}

fn print_agenda_line(projector: &AgendaProjector<Local>, report: &Report) {
    let time = report
        .scheduled_at
        .map(|at| at.in_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default();
    let client = report
        .client
        .as_ref()
        .map(|c| c.trade_name.as_str())
        .unwrap_or("-");
    let date = report
        .scheduled_at
        .map(|at| projector.local_date(&at).format("%d/%m").to_string())
        .unwrap_or_default();
    println!("  {} {} #{} {} - {} [{}]", date, time, report.id, client, report.description, report.status.label());
}
