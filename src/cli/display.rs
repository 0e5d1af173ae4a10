//! Terminal rendering of search results and download outcomes.

use azdo_harvest::{DownloadOutcome, SearchResultSet, Status};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use std::path::Path;

fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Magenta)),
        );
    table
}

pub fn print_header(term: &str, organization: &str, project: Option<&str>) {
    println!("{} {}", style("Searching for:").bold().blue(), term);
    println!("{} {}", style("Organization:").bold().blue(), organization);
    if let Some(project) = project {
        println!("{} {}", style("Project:").bold().blue(), project);
    }
}

pub fn repositories_table(results: &SearchResultSet) -> Table {
    let mut table = table(&["Repository", "Project", "URL"]);
    for repo in &results.repositories {
        table.add_row(vec![
            Cell::new(repo.name()).fg(Color::Cyan),
            Cell::new(&repo.project().name).fg(Color::Green),
            Cell::new(repo.url().unwrap_or("N/A")).fg(Color::Blue),
        ]);
    }
    table
}

pub fn files_table(results: &SearchResultSet) -> Table {
    let mut table = table(&["Repository", "File Path", "Branch"]);
    for file in &results.files {
        table.add_row(vec![
            Cell::new(&file.repository().name).fg(Color::Cyan),
            Cell::new(file.filepath()).fg(Color::Yellow),
            Cell::new(file.branch()).fg(Color::Green),
        ]);
    }
    table
}

pub fn print_results(results: &SearchResultSet) {
    if !results.repositories.is_empty() {
        println!("\n{}\n", style("═══ Repository Results ═══").bold().cyan());
        println!("{}", repositories_table(results));
        println!(
            "\n{}\n",
            style(format!("Found {} repositories", results.repositories.len())).bold()
        );
    }

    if !results.files.is_empty() {
        println!("\n{}\n", style("═══ File Results ═══").bold().cyan());
        println!("{}", files_table(results));
        println!(
            "\n{}\n",
            style(format!("Found {} file matches", results.files.len())).bold()
        );
    }

    if results.is_empty() {
        println!("{}", style("No results found.").yellow());
    }
}

pub fn outcomes_table(outcomes: &[DownloadOutcome]) -> Table {
    let mut table = table(&["Repository", "File Path", "Result"]);
    for outcome in outcomes {
        let result = match outcome.status() {
            Status::Success => Cell::new(
                outcome
                    .path()
                    .and_then(Path::file_name)
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
            .fg(Color::Green),
            Status::Fail(msg) => Cell::new(msg).fg(Color::Red),
            Status::HashMismatch(details) => Cell::new(details).fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&outcome.file().repository().name).fg(Color::Cyan),
            Cell::new(outcome.file().filepath()),
            result,
        ]);
    }
    table
}

pub fn print_outcomes(outcomes: &[DownloadOutcome], directory: &Path) {
    if outcomes.is_empty() {
        println!("{}", style("Nothing to download.").yellow());
        return;
    }

    println!("{}", outcomes_table(outcomes));
    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = outcomes.len() - succeeded;
    println!(
        "\n{} {} to {}",
        style(format!("Downloaded {}", succeeded)).bold().green(),
        if succeeded == 1 { "file" } else { "files" },
        directory.display()
    );
    if failed > 0 {
        println!("{}", style(format!("{} failed", failed)).bold().red());
    }
}
