//! an executable running the geometric Weisfeiler-Lehman test on two small graphs
//! example usage:
//! gwl --nbiter 2
//! gwl --nbiter 3 --parallel --json
//!
//! The two graphs are 4 nodes paths with the same edges, they differ by the position of the last node:
//! A = [(-1,1),(0,0),(1,0),(2,1)] and B = [(-1,1),(0,0),(1,0),(2,-1)].
//! They are not isometric. IGWL cannot separate them, GWL with 2 rounds can.
//! Set RUST_LOG=debug to follow rounds.

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};
use serde::Serialize;

use geowl::prelude::*;

/// what we dump for each variant
#[derive(Serialize)]
struct Report {
    params: GwlParams,
    colors_a: Vec<String>,
    colors_b: Vec<String>,
    possibly_isometric: bool,
}

fn parse_params(matches: &ArgMatches) -> Result<GwlParams, anyhow::Error> {
    log::debug!("in parse_params");
    let nb_iter = match matches.value_of("nbiter") {
        Some(str) => str.parse::<usize>().map_err(|_| anyhow!("error parsing nbiter : {}", str))?,
        None => DEFAULT_NB_ITER,
    };
    let params = GwlParams::new(nb_iter, Variant::MultiHop, matches.is_present("parallel"), matches.is_present("early_stop"));
    params.validate()?;
    Ok(params)
} // end of parse_params

fn run(ga: &GeometricGraph, gb: &GeometricGraph, params: GwlParams) -> Result<Report, anyhow::Error> {
    let colors_a = gwl(ga, &params)?;
    let colors_b = gwl(gb, &params)?;
    let possibly_isometric = possibly_isometric(&colors_a, &colors_b);
    Ok(Report { params, colors_a, colors_b, possibly_isometric })
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_default_env().init();
    //
    let matches = Command::new("gwl")
        .arg(
            Arg::new("nbiter")
                .long("nbiter")
                .required(false)
                .takes_value(true)
                .help("number of rounds of GWL, default 2"),
        )
        .arg(Arg::new("parallel").long("parallel").help("recolor nodes in parallel"))
        .arg(Arg::new("early_stop").long("early-stop").help("stop GWL when the partition is stable"))
        .arg(Arg::new("json").long("json").help("dump colors as json"))
        .get_matches();
    //
    let gwl_params = parse_params(&matches)?;
    let mut igwl_params = GwlParams::immediate();
    igwl_params.set_parallel(gwl_params.get_parallel());
    //
    let edges: [(usize, usize); 3] = [(0, 1), (1, 2), (2, 3)];
    let xa = vec![vec![-1., 1.], vec![0., 0.], vec![1., 0.], vec![2., 1.]];
    let xb = vec![vec![-1., 1.], vec![0., 0.], vec![1., 0.], vec![2., -1.]];
    let ga = GeometricGraph::from_rows(&xa, &edges)?;
    let gb = GeometricGraph::from_rows(&xb, &edges)?;
    //
    let mut reports = Vec::<(&str, Report)>::with_capacity(2);
    for (name, params) in [("IGWL", igwl_params), ("GWL", gwl_params)] {
        let report = run(&ga, &gb, params).map_err(|e| {
            log::error!("{} failed : {}", name, e);
            e
        })?;
        println!("{}: Isometric Graphs? {}", name, report.possibly_isometric);
        if report.possibly_isometric {
            println!("{} could not separate the graphs", name);
        } else {
            println!("{} separated the graphs", name);
        }
        println!("{}", "__".repeat(10));
        reports.push((name, report));
    }
    //
    if matches.is_present("json") {
        let dump: serde_json::Map<String, serde_json::Value> = reports
            .iter()
            .map(|(name, report)| Ok((name.to_string(), serde_json::to_value(report)?)))
            .collect::<Result<_, serde_json::Error>>()?;
        println!("{}", serde_json::to_string_pretty(&dump)?);
    }
    Ok(())
} // end of main
