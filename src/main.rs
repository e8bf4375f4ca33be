use std::env;
use std::process;

use env_logger::Env;
use getopts::Options;

use battlefield_link::client::{self, ClientConfig};
use battlefield_link::Endpoint;

const DEFAULT_ORIGIN: &str = "127.0.0.1:8080";
const DEFAULT_EVENTS_SHOWN: usize = 5;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt(
        "o",
        "origin",
        "origin the battlefield is served from (https/wss needs a build with the `tls` feature)",
        DEFAULT_ORIGIN
    );
    opts.optopt("e", "events", "how many recent events to show", "5");
    opts.optflag("h", "help", "print this help message");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => { m }
        Err(f) => {
            eprintln!("{}", f);
            process::exit(2);
        }
    };

    if matches.opt_present("h") {
        let brief = format!("Usage: {} [options]", program);
        print!("{}", opts.usage(&brief));
        return;
    }

    let origin = matches.opt_str("o").unwrap_or(DEFAULT_ORIGIN.to_string());
    let endpoint = match Endpoint::from_origin(&origin) {
        Ok(endpoint) => endpoint,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    };

    let events_shown = match matches.opt_get_default("e", DEFAULT_EVENTS_SHOWN) {
        Ok(count) => count,
        Err(err) => {
            eprintln!("--events: {}", err);
            process::exit(2);
        }
    };

    client::run(ClientConfig {
        endpoint: endpoint,
        events_shown: events_shown
    });
}
