//! Print the OpenAPI document as JSON.

use std::io::Write;

use prowd_backend::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let document = ApiDoc::openapi().to_pretty_json()?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{document}")?;
    Ok(())
}
