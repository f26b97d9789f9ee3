use crate::app::command_support::load_recipe_file;
use crate::catalog::Catalog;
use crate::config::Settings;
use crate::recipe::{serialize_pipeline, serialize_pipeline_compact};
use std::path::Path;

pub fn cmd_check(args: &[String], settings: &Settings) -> Result<String, String> {
    if args.len() != 1 {
        return Err("usage: check <recipe>".to_string());
    }
    let pipeline = load_recipe_file(Catalog::builtin(), Path::new(&args[0]))?;
    if settings.pretty_recipes {
        Ok(serialize_pipeline(&pipeline))
    } else {
        Ok(serialize_pipeline_compact(&pipeline))
    }
}
