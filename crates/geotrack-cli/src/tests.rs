use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["geotrack-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_runs_command() {
    let cli = Cli::try_parse_from(["geotrack-cli", "runs"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Runs)));
}

#[test]
fn report_defaults_to_latest_run_and_all_providers() {
    let cli = Cli::try_parse_from(["geotrack-cli", "report"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            run: None,
            provider: None
        })
    ));
}

#[test]
fn report_accepts_run_and_provider() {
    let cli = Cli::try_parse_from([
        "geotrack-cli",
        "report",
        "--run",
        "20260210_100000",
        "--provider",
        "gemini",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Report { run, provider }) => {
            assert_eq!(run.as_deref(), Some("20260210_100000"));
            assert_eq!(provider.as_deref(), Some("gemini"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_costs_with_run() {
    let cli = Cli::try_parse_from(["geotrack-cli", "costs", "--run", "r1"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Costs { run: Some(ref r) }) if r == "r1"
    ));
}

#[test]
fn parses_db_subcommands() {
    let cli = Cli::try_parse_from(["geotrack-cli", "db", "ping"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));

    let cli =
        Cli::try_parse_from(["geotrack-cli", "db", "stats"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Stats
        })
    ));
}

#[test]
fn db_requires_a_subcommand() {
    assert!(Cli::try_parse_from(["geotrack-cli", "db"]).is_err());
}

#[test]
fn export_defaults_to_all_runs_and_export_csv() {
    let cli = Cli::try_parse_from(["geotrack-cli", "export"]).expect("expected valid cli args");
    match cli.command {
        Some(Commands::Export { run, output }) => {
            assert!(run.is_none());
            assert_eq!(output, std::path::PathBuf::from("export.csv"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn export_accepts_short_output_flag() {
    let cli = Cli::try_parse_from(["geotrack-cli", "export", "--run", "r1", "-o", "/tmp/r1.csv"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Export { run: Some(ref r), ref output })
            if r == "r1" && output.to_str() == Some("/tmp/r1.csv")
    ));
}
