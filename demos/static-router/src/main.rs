mod scenario;
mod switch;

use clap::{App, Arg, ArgMatches, ErrorKind};
use crossbeam::crossbeam_channel;
use flowrouter_core::config::DEFAULT_IDLE_TIMEOUT;
use flowrouter_core::controller::format_dpid;
use flowrouter_core::{
    ChannelConnection, Controller, RouteEntry, RouteTable, RouterConfig, Topology,
};
use tracing::{error, info, info_span};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let matches = App::new("Static Flowrouter")
        .version("0.1")
        .author("Flowrouter Contributors")
        .about("Replay a scripted packet-in sequence against static routers")
        .arg(
            Arg::with_name("topology")
                .short("t")
                .long("topology")
                .value_name("NAME")
                .help("Switch layout to drive")
                .possible_values(&["single", "dual"])
                .default_value("single")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("route")
                .short("r")
                .long("route")
                .value_name("NETWORK,HOST,IFACE,GATEWAY,PORT,MAC")
                .help("Route to use instead of the built-in table, in lookup order")
                .multiple(true)
                .number_of_values(1)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("idle_timeout")
                .long("idle-timeout")
                .value_name("SECONDS")
                .help("Idle timeout of installed flow rules")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("no_proxy_arp")
                .long("no-proxy-arp")
                .help("Only answer ARP requests for router interface addresses"),
        )
        .get_matches();

    let topology = match matches.value_of("topology") {
        Some("dual") => Topology::DualSwitch,
        _ => Topology::SingleSwitch,
    };
    let configs = topology
        .configs()
        .into_iter()
        .map(|(dpid, config)| (dpid, customize(config, &matches)))
        .collect();

    let mut controller = Controller::new().switch_configs(configs);
    let mut dpids: Vec<_> = topology.configs().keys().copied().collect();
    dpids.sort();

    let mut switches = vec![];
    for dpid in dpids.iter().copied() {
        let (s, r) = crossbeam_channel::unbounded();
        switches.push((dpid, switch::spawn(dpid, r)));
        if let Err(err) = controller.connection_up(dpid, ChannelConnection::new(s)) {
            error!(%err, "Could not bring up switch");
        }
    }

    for step in scenario::steps(topology) {
        let span = info_span!(
            "packet_in",
            dpid = %format_dpid(step.dpid),
            in_port = step.packet_in.in_port
        );
        let _enter = span.enter();
        info!("{}", step.description);
        if let Err(err) = controller.packet_in(step.dpid, step.packet_in) {
            error!(%err, "Packet-in failed");
        }
    }

    for dpid in dpids {
        controller.connection_down(dpid);
    }
    for (dpid, handle) in switches {
        match handle.join() {
            Ok(count) => info!(dpid = %format_dpid(dpid), commands = count, "Switch finished"),
            Err(_) => error!(dpid = %format_dpid(dpid), "Switch thread panicked"),
        }
    }

    println!("The world has been routed");
}

fn customize(mut config: RouterConfig, matches: &ArgMatches) -> RouterConfig {
    if let Some(routes) = matches.values_of("route") {
        let entries = routes
            .map(|route| {
                route.parse::<RouteEntry>().unwrap_or_else(|err| {
                    clap::Error::with_description(&err.to_string(), ErrorKind::InvalidValue).exit()
                })
            })
            .collect();
        config = config.routes(RouteTable::with_entries(entries));
    }

    let idle_timeout = match matches.value_of("idle_timeout") {
        Some(value) => value.parse::<u16>().unwrap_or_else(|_| {
            clap::Error::with_description(
                &format!("invalid idle timeout `{}`", value),
                ErrorKind::InvalidValue,
            )
            .exit()
        }),
        None => DEFAULT_IDLE_TIMEOUT,
    };

    config
        .idle_timeout(idle_timeout)
        .proxy_arp(!matches.is_present("no_proxy_arp"))
}
