use crate::{cli::Args, vars::MDSWEEP_API_KEY};

pub fn run(args: Args, fallback_bind: String) {
    let bind = args.check_bind.unwrap_or(fallback_bind);
    let endpoint = format!("http://{bind}/api/healthcheck");
    println!("Checking {endpoint}");

    let mut request = minreq::get(endpoint).with_timeout(1);
    if !MDSWEEP_API_KEY.is_empty() {
        request = request.with_header("Authorization", format!("Bearer {}", *MDSWEEP_API_KEY));
    }

    match request.send() {
        Ok(resp) if resp.status_code == 200 => println!("Health check passed"),
        Ok(resp) => {
            eprintln!("Health check failed with status: {}", resp.status_code);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Health check failed: {e}");
            std::process::exit(1);
        }
    }
}
