use anyhow::Context;
use clap::Parser;
use pycraft_launcher::utils::{logger, validation::Validate};
use pycraft_launcher::{Doctor, DoctorCli, LaunchManifest, SystemRunner, TerminalConsole};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = DoctorCli::parse();

    logger::init_cli_logger(args.verbose);

    println!("{}", "=".repeat(50));
    println!("PyCraft 編輯器測試腳本");
    println!("{}", "=".repeat(50));

    let manifest = LaunchManifest::load(args.manifest.as_deref())
        .context("failed to load launcher manifest")?;
    manifest
        .validate()
        .context("launcher manifest is invalid")?;

    let doctor = Doctor::new(SystemRunner::new(), TerminalConsole::new(), manifest);
    let report = doctor.run(args.skip_launch).await;

    if report.passed {
        println!();
        println!("所有測試通過！PyCraft編輯器已準備就緒。");
    } else {
        println!();
        println!("測試失敗！請查看日誌文件了解詳情。");
    }

    std::process::exit(report.exit_code());
}
