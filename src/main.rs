use clap::Parser;
use log::{error, info};

use portapps::{
    args::{attributes_mask, build_shortcut, release_overrides, ArgsClap, Command},
    conf::config::BuildConfigProvider,
    download::HttpDownloader,
    release::release_header::ReleaseManager,
    strategy::strategy_factory::StrategyFactory,
    utils::init_logger::init_logger,
    win::{attributes::set_file_attributes, shortcut::create_shortcut, winver::raw_winver},
    DynResult,
};

fn main() -> DynResult<()> {
    let args = ArgsClap::parse();
    init_logger(&args.level);

    match args.command {
        Command::Release {
            config,
            define,
            debug,
        } => {
            let mut manager = ReleaseManager::new(
                Box::new(BuildConfigProvider::new(&config)),
                Box::new(HttpDownloader::default()),
                release_overrides(&define, debug),
            );
            let strategy = StrategyFactory::get_strategy(&mut manager);
            strategy(&mut manager);
            if manager.state.skip_next {
                return Err("Release failed, see log for details".into());
            }
            info!("Released {:?}", manager.state.packages);
        }
        Command::Shortcut {
            path,
            target,
            arguments,
            description,
            icon,
            working_dir,
            clear,
        } => {
            let shortcut =
                build_shortcut(path, target, [arguments, description, icon, working_dir], &clear);
            create_shortcut(&shortcut).map_err(|err| {
                error!("{:?}", err);
                err.to_string()
            })?;
        }
        Command::Attrib {
            path,
            readonly,
            hidden,
            system,
            archive,
        } => {
            set_file_attributes(&path, attributes_mask(readonly, hidden, system, archive))
                .map_err(|err| {
                    error!("{:?}", err);
                    err.to_string()
                })?;
        }
        Command::Winver => {
            let version = raw_winver().map_err(|err| {
                error!("{:?}", err);
                err.to_string()
            })?;
            println!("{}", version);
        }
    }
    Ok(())
}
