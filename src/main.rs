use clap::Parser;
use cpu_sched_sim::config::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let output = cli.output.clone();
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    log::info!("{config:?}");

    let report = cpu_sched_sim::simulate(&config);

    println!("{report}");
    log::debug!(
        "turnaround std dev {}, peak ready queue {}",
        report.turnaround_std_dev,
        report.max_ready_queue
    );

    if let Err(e) = report.write_record(&output) {
        eprintln!("error: cannot write {}: {e}", output.display());
        std::process::exit(1);
    }
}
