use galaxy::{GalaxyParams, Viewer};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional particle count: `galaxy 250000`
    let mut params = GalaxyParams::default();
    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse::<u32>() {
            Ok(count) => params = params.with_count(count),
            Err(_) => log::warn!("ignoring invalid particle count {:?}", arg),
        }
    }

    if let Err(e) = Viewer::new().with_params(params).run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
