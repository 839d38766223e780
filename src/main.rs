use anyhow::{Context, Result};
use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use flowprobe::config::ProbeConfig;
use flowprobe::io::Format;
use flowprobe::net::{FlowSession, catalog};
use flowprobe::options::{Action, Options, TableKind};
use flowprobe::probe::{self, LinearTable, ProbeSession, ProbeTable, TieredTable};

fn main() -> Result<()> {
    if std::env::var("FLOWPROBE_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("FLOWPROBE_LOG")
            .write_style("FLOWPROBE_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    // flags from the environment come first so the command line wins
    let mut flags = shellwords::split(&std::env::var("FLOWPROBE_FLAGS").unwrap_or_default())
        .context("FLOWPROBE_FLAGS has unbalanced quotes")?;
    flags.extend(std::env::args().skip(1));

    let options = Options::parse_from_args(&flags).unwrap_or_else(|err| {
        // clap formats its own help and usage errors
        match err.downcast::<clap::Error>() {
            Ok(clap_err) => clap_err.exit(),
            Err(err) => {
                eprintln!("error: {:#}", err);
                std::process::exit(2);
            }
        }
    });
    log::debug!("options: {:?}", options);

    let config = ProbeConfig::load_from_file(&options.config)?;
    run(&options, &config)
}

fn run(options: &Options, config: &ProbeConfig) -> Result<()> {
    let mut rng = match options.seed.or(config.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match &options.action {
        Action::List => {
            let listing = catalog::ALL
                .iter()
                .map(|spec| format!("{:<14}{}", spec.name, spec.title))
                .join("\n");
            println!("{}", listing);
            Ok(())
        }
        Action::Flow {
            scenario,
            transitions,
        } => {
            let mut session = FlowSession::new(catalog::load(scenario)?);
            for name in transitions {
                let step = session.steps() + 1;
                session
                    .fire(name)
                    .with_context(|| format!("step {} of {}", step, scenario))?;
            }
            emit(options, &session.snapshot())
        }
        Action::Dot { scenario } => {
            let scenario = catalog::load(scenario)?;
            print!("{}", scenario.net.to_dot(&scenario.reset()));
            Ok(())
        }
        Action::Probe { kind, count, fill } => match kind {
            TableKind::Linear => {
                let table = LinearTable::new(config.linear_capacity)?;
                fill_session(options, config, table, *count, *fill, &mut rng)
            }
            TableKind::Tiered => {
                let table = TieredTable::new(&config.tiers)?;
                fill_session(options, config, table, *count, *fill, &mut rng)
            }
        },
        Action::Compare => {
            let comparison = probe::compare_at_fill(
                config.linear_capacity,
                &config.tiers,
                config.fill_ratio,
                &mut rng,
            )?;
            emit(options, &comparison)
        }
    }
}

fn fill_session<T: ProbeTable>(
    options: &Options,
    config: &ProbeConfig,
    table: T,
    count: Option<usize>,
    fill: bool,
    rng: &mut StdRng,
) -> Result<()> {
    let mut session = ProbeSession::new(table);
    let inserted = if fill {
        session.fill_to(config.fill_ratio, rng)
    } else {
        session.insert_many(count.unwrap_or(config.batch_size), rng)
    };
    log::info!(
        "inserted {} keys, {} of {} slots used",
        inserted,
        session.table().occupied(),
        session.table().capacity()
    );
    emit(options, &session.snapshot())
}

fn emit<T: Serialize>(options: &Options, value: &T) -> Result<()> {
    let rendered = render(options.format, value)?;
    match &options.output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("Failed to write {}", path))
        }
        None => {
            println!("{}", rendered);
            Ok(())
        }
    }
}

fn render<T: Serialize>(format: Format, value: &T) -> Result<String> {
    format.render(value).context("Failed to serialize snapshot")
}
