use log::{debug, Level};

use crate::release::release_header::{ReleaseManager, ReleaseThings};

pub struct StrategyFactory;

trait Strategy {
    fn run(manager: &mut ReleaseManager);
}

impl StrategyFactory {
    pub fn get_strategy(_manager: &mut ReleaseManager) -> impl Fn(&mut ReleaseManager) {
        ReleaseStrategy::run
    }
}

/// Validate, release every arch, then finalize and clean.
struct ReleaseStrategy;
impl Strategy for ReleaseStrategy {
    fn run(manager: &mut ReleaseManager) {
        manager
            .bind(|this| this.load_config(), Level::Error)
            .bind(|this| this.validate(), Level::Error);
        if manager.state.skip_next {
            debug!("Nothing done, validation failed");
            return;
        }
        manager
            .or_log_err(|this| this.set_title(), Level::Debug)
            .bind(|this| this.prepare_folders(), Level::Error)
            .bind(|this| this.release(), Level::Error)
            .or_log_err(|this| this.finalize(), Level::Error)
            .bind(|this| this.cleanup(), Level::Error);
    }
}
