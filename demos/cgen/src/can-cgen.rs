/*
 * Copyright (C) 2015-2023 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Redpesk interface code/config use MIT License and can be freely copy/modified even within proprietary code
 * License: $RP_BEGIN_LICENSE$ SPDX:MIT https://opensource.org/licenses/MIT $RP_END_LICENSE$
 *
 */
extern crate dbccgen;
extern crate dbcparser;

use dbccgen::prelude::*;
use dbcparser::prelude::*;
use env_logger::Env;

fn main() -> Result<(), String> {
    let env = Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).format_timestamp_millis().try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 5 {
        let cmd = args.first().map_or("can-cgen", String::as_str);
        return Err(format!("usage: {cmd} <dbcfile> <database-name> <source.c> <header.h>"));
    }
    let (dbcfile, database_name, source, header) = (&args[1], &args[2], &args[3], &args[4]);

    let database = match DbcObject::from_file(dbcfile) {
        Err(error) => return Err(format!("fail parsing {dbcfile}: {error}")),
        Ok(value) => value,
    };
    log::info!("dbc:{} messages:{} nodes:{}", dbcfile, database.messages.len(), database.nodes.len());

    if let Err(error) = generate_c_code(&database, database_name, source, header) {
        return Err(format!("fail generating C code: {error}"));
    }
    Ok(())
}
