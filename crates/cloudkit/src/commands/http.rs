use anyhow::Result;

use cloudkit::format_http_response;
use cloudkit_core::parse::parse_lenient;

use super::print_json;

#[derive(Debug, clap::Parser)]
pub struct HttpResponseCommand {
    /// HTTP status code.
    #[arg(long, default_value = "200")]
    pub status: u16,

    /// Request input to echo back. JSON or plain text.
    #[arg(long, default_value = "null")]
    pub input: String,

    /// Handler result. JSON or plain text.
    #[arg(long, default_value = "null")]
    pub result: String,
}

pub fn run(cmd: HttpResponseCommand) -> Result<()> {
    let response = format_http_response(
        cmd.status,
        &parse_lenient(&cmd.input),
        &parse_lenient(&cmd.result),
    )?;
    print_json(&response)
}
