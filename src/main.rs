use tvc_address_engine::cli::Cli;
use tvc_address_engine::utils::init_logger;

fn main() -> anyhow::Result<()> {
    init_logger().ok();
    let cli = Cli::parse_args();
    cli.execute()
}
