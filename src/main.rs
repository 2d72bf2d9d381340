//! Command line front end: loads one file, toggles the requested columns and
//! writes the filtered export into the output directory.
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::ValueEnum;
use column_extractor::ExtractError;
use column_extractor::Session;
use column_extractor::TabularFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "column-extractor")]
#[command(about = "Pick columns out of an Excel or CSV file and export them")]
#[command(
    long_about = r#"Pick columns out of an Excel or CSV file and export them

USAGE:
  column-extractor people.csv --list                 # Show the columns
  column-extractor people.csv -c name -c age --preview
  column-extractor report.xlsx --columns name,city -f csv -o out/

The export is written as filtered_<name>.<ext>. Set RUST_LOG=debug for
verbose logging."#
)]
#[command(version)]
struct Cli {
    /// Excel (.xlsx) or CSV (.csv) file to read
    input: PathBuf,

    /// Toggle a column; repeat to pick several, in order
    #[arg(short = 'c', long = "column", value_name = "NAME")]
    columns: Vec<String>,

    /// Comma separated list of columns, toggled after --column
    #[arg(long = "columns", value_name = "A,B", value_delimiter = ',')]
    column_list: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Xlsx)]
    format: FormatArg,

    /// Directory the export is written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Print the file summary and its columns
    #[arg(long)]
    list: bool,

    /// Print the first rows of the selected columns
    #[arg(long)]
    preview: bool,
}

/// Output format argument
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Excel workbook
    Xlsx,
    /// Comma-separated values
    Csv,
}

impl From<FormatArg> for TabularFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Xlsx => TabularFormat::Xlsx,
            FormatArg::Csv => TabularFormat::Csv,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<ExtractError>() {
                Some(extract) => eprintln!("{}", extract.user_message()),
                None => eprintln!("Error: {error:#}"),
            }
            tracing::debug!("{error:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut session = Session::new();
    session.open_path(&cli.input)?;
    session.set_format(cli.format.into());

    for column in cli.columns.iter().chain(&cli.column_list) {
        if !session.columns().contains(column) {
            eprintln!("Unknown column '{column}'");
            continue;
        }
        session.toggle_column(column);
    }

    if cli.list {
        print_summary(&session);
    }
    if cli.preview {
        if let Some(preview) = session.preview() {
            if preview.is_empty() {
                println!("No columns selected");
            } else {
                print!("{preview}");
            }
        }
    }

    // Listing or previewing alone is a complete run; otherwise an empty selection fails below
    if !session.can_download() && (cli.list || cli.preview) {
        return Ok(());
    }

    let export = session.download()?;
    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Create output directory '{}' failed", cli.output_dir.display()))?;
    let path = export
        .save_to(&cli.output_dir)
        .with_context(|| format!("Write '{}' failed", export.file_name))?;
    println!("{}", path.display());
    Ok(())
}

fn print_summary(session: &Session) {
    if let Some(file) = session.file() {
        println!("{} ({})", file.name, file.size_megabytes());
    }
    if let Some(dataset) = session.dataset() {
        println!("{} rows", dataset.row_count());
    }
    for (index, column) in session.columns().iter().enumerate() {
        let marker = if session.selection().contains(column) { "*" } else { " " };
        println!("{marker} {:>3}. {column}", index + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people_file() -> (tempfile::TempDir, PathBuf) {
        let directory = tempfile::tempdir().unwrap();
        let input = directory.path().join("people.csv");
        std::fs::write(&input, "name,age\nAlice,30\n").unwrap();
        (directory, input)
    }

    #[test]
    fn export_without_columns_fails() {
        let (directory, input) = people_file();
        let output = directory.path().join("out");
        let cli = Cli::parse_from(["column-extractor", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);

        let error = run(cli).unwrap_err();
        assert!(matches!(error.downcast_ref::<ExtractError>(), Some(ExtractError::NoColumnsSelected)));
        assert!(!output.exists());
    }

    #[test]
    fn unknown_columns_only_fails() {
        let (directory, input) = people_file();
        let cli = Cli::parse_from([
            "column-extractor",
            input.to_str().unwrap(),
            "-c",
            "missing",
            "-o",
            directory.path().to_str().unwrap(),
        ]);

        let error = run(cli).unwrap_err();
        assert!(matches!(error.downcast_ref::<ExtractError>(), Some(ExtractError::NoColumnsSelected)));
    }

    #[test]
    fn list_without_columns_succeeds() {
        let (_directory, input) = people_file();
        let cli = Cli::parse_from(["column-extractor", input.to_str().unwrap(), "--list"]);
        assert!(run(cli).is_ok());
    }

    #[test]
    fn export_selected_column() {
        let (directory, input) = people_file();
        let cli = Cli::parse_from([
            "column-extractor",
            input.to_str().unwrap(),
            "--columns",
            "age",
            "-f",
            "csv",
            "-o",
            directory.path().to_str().unwrap(),
        ]);

        run(cli).unwrap();
        let written = std::fs::read_to_string(directory.path().join("filtered_people.csv")).unwrap();
        assert_eq!(written, "age\n30\n");
    }
}
