//! Command-line argument parsing for ReportSched

/// Parse command line arguments
pub struct Args {
    pub once: bool,
    pub validate: bool,
    pub help: bool,
    pub reports: Option<String>,
}

pub fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    parse_args_internal(&args)
}

fn parse_args_internal(args: &[String]) -> Args {
    let mut result = Args {
        once: false,
        validate: false,
        help: false,
        reports: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--once" => result.once = true,
            "--validate" => result.validate = true,
            "--help" | "-h" => result.help = true,
            "--reports" => {
                if i + 1 < args.len() {
                    i += 1;
                    result.reports = Some(args[i].clone());
                }
            }
            _ => {}
        }
        i += 1;
    }

    result
}

pub fn print_help() {
    println!("ReportSched - periodic report dispatcher\n");
    println!("USAGE:");
    println!("    reportsched [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    --once              Print next-fire delays for every report and exit");
    println!("    --validate          Validate configuration and report definitions, then exit");
    println!("    --reports FILE      Read report definitions from FILE (overrides REPORTS_PATH)");
    println!("    --help, -h          Show this help message\n");
    println!("ENVIRONMENT:");
    println!("    REPORTS_PATH        Path to the report definitions JSON (default ./reports.json)");
    println!("    MAX_REPORTS         Upper bound on definitions accepted (default 100)");
}
