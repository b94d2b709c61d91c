use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, tune::TuneArg};

mod auto_play;
mod tune;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve heuristic weights with a genetic algorithm
    Tune(#[clap(flatten)] TuneArg),
    /// Play a headless game with fixed weights
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::AutoPlay(AutoPlayArg::default())) {
        Mode::Tune(arg) => tune::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use autotris_engine::RngSeed;
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_tune() {
        let args = CommandArgs::try_parse_from([
            "autotris",
            "tune",
            "--population",
            "20",
            "--generations",
            "3",
            "--seed",
            "000000000000000000000000000000ff",
            "--json",
        ])
        .unwrap();
        let Some(Mode::Tune(arg)) = args.mode else {
            panic!("expected tune mode");
        };
        let config = arg.config();
        assert_eq!((config.population, config.rounds, config.moves), (20, 5, 200));
        assert_eq!(arg.generations, Some(3));
        assert_eq!(arg.seed, Some(RngSeed::from(0xff)));
        assert!(arg.json);
    }

    #[test]
    fn test_parse_auto_play() {
        let args =
            CommandArgs::try_parse_from(["autotris", "auto-play", "--weights", "1,2,3,4"]).unwrap();
        let Some(Mode::AutoPlay(arg)) = args.mode else {
            panic!("expected auto-play mode");
        };
        assert_eq!(arg.weights.map(|w| w.to_array()), Some([1.0, 2.0, 3.0, 4.0]));
        let defaults = AutoPlayArg::default();
        assert_eq!((arg.moves, arg.lookahead), (defaults.moves, defaults.lookahead));
    }

    #[test]
    fn test_rejects_bad_values() {
        for argv in [
            &["autotris", "auto-play", "--weights", "1,2,3"][..],
            &["autotris", "auto-play", "--seed", "xyz"],
            &["autotris", "tune", "--population", "-1"],
        ] {
            assert!(CommandArgs::try_parse_from(argv).is_err(), "{argv:?}");
        }
    }

    #[test]
    fn test_default_mode_is_auto_play() {
        let args = CommandArgs::try_parse_from(["autotris"]).unwrap();
        assert!(args.mode.is_none());
    }
}
