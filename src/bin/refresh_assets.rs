//! Regenerates `assets/*.json` from the API's list endpoints.
//!
//! Run natively from the crate root: `cargo run --bin refresh-assets`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::fs;
    use std::path::Path;

    use log::{info, LevelFilter};
    use pokemon_finder::config::API_BASE;
    use pokemon_finder::{ApiData, Category};
    use serde::Deserialize;

    /// Page returned by `/{resource}?limit=N`.
    #[derive(Deserialize)]
    struct ResourceList {
        count: usize,
        results: Vec<ApiData>,
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!("[{}] {}", record.level(), message))
            })
            .level(LevelFilter::Info)
            .chain(std::io::stdout())
            .apply()?;

        let client = reqwest::blocking::Client::new();
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        fs::create_dir_all(&assets)?;

        for category in Category::ALL {
            let url = format!("{}/{}?limit=100000", API_BASE, category.resource());
            info!("Fetching {}", url);
            let list: ResourceList = client.get(&url).send()?.error_for_status()?.json()?;
            if list.results.len() != list.count {
                return Err(format!(
                    "{} lists {} of {} entries",
                    url,
                    list.results.len(),
                    list.count
                )
                .into());
            }

            let path = assets.join(category.asset());
            let mut json = serde_json::to_string_pretty(&list.results)?;
            json.push('\n');
            fs::write(&path, json)?;
            info!("Wrote {} entries to {}", list.results.len(), path.display());
        }
        Ok(())
    }
}
