use spamc_codec::{
    encode_request, parse_request, parse_response,
    parser::{parse_action_option, parse_header_line, parse_message_class},
    Body, HeaderValue, Request, Response,
};

use anyhow::{bail, Context, Result};
use log::{debug, info};

use std::{
    fs::File,
    io::{Read, Write},
    path::PathBuf,
};

use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "spamcutil")]
struct AppArgs {
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    Encode(EncodeArgs),
    Decode(DecodeArgs),
    Cat(CatArgs),
}

#[derive(StructOpt, Debug)]
struct EncodeArgs {
    /// Method of the request, e.g. CHECK, SYMBOLS, REPORT, PROCESS, TELL
    #[structopt(short, long, default_value = "CHECK")]
    method: String,
    /// Extra header, as `Name: value`, may be given more than once
    #[structopt(short = "H", long = "header", number_of_values = 1)]
    headers: Vec<String>,
    /// User whose preferences spamd should use
    #[structopt(short, long)]
    user: Option<String>,
    /// Message class for TELL requests, ham or spam
    #[structopt(long)]
    message_class: Option<String>,
    /// Databases to add the message to for TELL requests, e.g. `local, remote`
    #[structopt(long)]
    set: Option<String>,
    /// Databases to remove the message from for TELL requests
    #[structopt(long)]
    remove: Option<String>,
    /// Compress the body with zlib
    #[structopt(short, long)]
    compress: bool,
    /// Add a Content-length header matching the body sent on the wire
    #[structopt(long)]
    content_length: bool,
    /// Email to send as the body of the request
    #[structopt(short, long, parse(from_os_str))]
    body: Option<PathBuf>,
    /// File to save the encoded request to
    #[structopt(name = "Output", parse(from_os_str))]
    output: PathBuf,
}

#[derive(StructOpt, Debug)]
struct DecodeArgs {
    /// Response from spamd to decode
    #[structopt(name = "File", parse(from_os_str))]
    file: PathBuf,
    /// Save the decompressed body to this file
    #[structopt(long, parse(from_os_str))]
    body_out: Option<PathBuf>,
    /// Fail unless spamd answered EX_OK
    #[structopt(long)]
    check: bool,
}

#[derive(StructOpt, Debug)]
struct CatArgs {
    /// Request or response file to display
    #[structopt(name = "File", parse(from_os_str))]
    file: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = AppArgs::from_args();

    match args.cmd {
        Command::Encode(args) => encode_to_file(args),
        Command::Decode(args) => command_decode(args),
        Command::Cat(args) => cat(args),
    }
}

fn build_request(args: &EncodeArgs) -> Result<Request> {
    let mut request = Request::new(args.method.clone()).compress(args.compress);

    for header in &args.headers {
        let header = parse_header_line(header)
            .with_context(|| format!("Invalid --header {:?}", header))?;
        request = request.header(header);
    }

    if let Some(user) = &args.user {
        request = request.user(user.clone());
    }

    if let Some(class) = &args.message_class {
        request = request.message_class(parse_message_class(class)?);
    }

    if let Some(set) = &args.set {
        request = request.set(parse_action_option(set)?);
    }

    if let Some(remove) = &args.remove {
        request = request.remove(parse_action_option(remove)?);
    }

    if let Some(path) = &args.body {
        let body = read_file(path).with_context(|| format!("Could not read {:?}", path))?;
        request = request.body(Body::Bytes(body));
    }

    if args.content_length {
        // The encoder rewrites this to the length of the wire body
        request = request.header(HeaderValue::ContentLength(0));
    }

    Ok(request)
}

fn encode_to_file(args: EncodeArgs) -> Result<()> {
    if args.output.exists() {
        bail!("Please provide an output file which doesn't exist");
    }

    let request = build_request(&args)?;
    debug!("Request: {:#?}", request);

    let encoded = encode_request(&request)?;
    write_file(&args.output, &encoded)
        .with_context(|| format!("Unable to save request to {:?}", args.output))?;

    info!("Wrote {} bytes to {:?}", encoded.len(), args.output);
    Ok(())
}

fn print_headers<'a>(headers: impl IntoIterator<Item = &'a HeaderValue>) {
    for header in headers {
        println!("  {}: {}", header.name(), header.value_string());
    }
}

fn print_response(response: &Response) {
    println!("Protocol: SPAMD/{}", response.protocol_version);
    println!(
        "Status: {} ({}): {}",
        response.status,
        response.status.description(),
        response.message
    );
    println!("Headers:");
    print_headers(&response.headers);
}

fn command_decode(args: DecodeArgs) -> Result<()> {
    let data = read_file(&args.file).context("Could not read response file")?;
    let response = parse_response(&data).context("Unable to parse provided response")?;

    print_response(&response);

    match (&response.body, &args.body_out) {
        (Some(body), Some(out)) => {
            if out.exists() {
                bail!("Please provide a body file which doesn't exist");
            }
            write_file(out, body).with_context(|| format!("Unable to save body to {:?}", out))?;
        }
        (Some(body), None) => println!("Body: {}", String::from_utf8_lossy(body)),
        (None, _) => println!("WARNING: response contained no body"),
    }

    if args.check {
        response.error_for_status()?;
    }

    Ok(())
}

fn cat(args: CatArgs) -> Result<()> {
    pager::Pager::with_default_pager("less").setup();
    let data = read_file(&args.file).context("Could not read data file")?;

    // Responses always start with the protocol name, requests with a method
    if data.starts_with(b"SPAMD/") {
        let response = parse_response(&data).context("Unable to parse provided response")?;
        print_response(&response);

        if let Some(body) = &response.body {
            println!("Body: {}", String::from_utf8_lossy(body));
        }
    } else {
        let request = parse_request(&data).context("Unable to parse provided request")?;
        println!("Method: {}", request.method);
        println!("Compressed: {}", request.compress);
        println!("Headers:");
        print_headers(&request.headers);

        if let Some(body) = &request.body {
            println!("Body: {}", String::from_utf8_lossy(body.as_bytes()));
        }
    }

    Ok(())
}

fn write_file(path: &PathBuf, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;

    Ok(())
}

fn read_file(path: &PathBuf) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut buffer: Vec<u8> = Vec::new();

    file.read_to_end(&mut buffer)?;
    Ok(buffer)
}
