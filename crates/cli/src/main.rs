//! Command-line entry point for `crewfit`.
//!
//! All behavior lives in `crewfit-server`; this binary only delegates.

fn main() -> anyhow::Result<()> {
    crewfit_server::run()
}
