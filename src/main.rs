//! IronCore HD 主入口
//! 生成一个助记词，并为配置中的每条链派生钱包

use anyhow::{Context, Result};
use ironcore_hd::{
    config::{Config, ReportConfig},
    domain::{MultiChainWalletService, WalletReport},
    infrastructure::{
        log_redact::{redact_hex_string, redact_mnemonic, RedactedWallet, SensitiveRedact},
        logging::init_logging,
    },
};
use serde_json::json;

fn main() -> Result<()> {
    // 1. 加载环境变量
    dotenvy::dotenv().ok();

    // 2. 加载配置文件（如果存在CONFIG_PATH）
    let config_path = std::env::var("CONFIG_PATH").ok();
    let config = Config::from_env_and_file(config_path.as_deref())
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // 3. 初始化日志
    init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(
        chains = ?config.derivation.chains,
        address_index = config.derivation.address_index,
        "starting HD wallet derivation"
    );

    // 4. 派生（任一链失败即整体失败，不输出部分结果）
    let service = MultiChainWalletService::with_options(config.derivation.to_options());
    let report = service
        .create(&config.derivation.chains)
        .context("Wallet derivation failed")?;

    tracing::debug!(report = %report.redact(), "wallet report ready");

    // 5. 输出
    print_report(&report, &config.report)?;

    Ok(())
}

fn print_report(report: &WalletReport, config: &ReportConfig) -> Result<()> {
    if config.format == "json" {
        let document = if config.reveal_secrets {
            json!({
                "mnemonic": report.mnemonic.as_str(),
                "wallets": report.wallets,
            })
        } else {
            json!({
                "mnemonic": redact_mnemonic(report.mnemonic.as_str()),
                "wallets": report.wallets.iter().map(RedactedWallet::from).collect::<Vec<_>>(),
            })
        };
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let mnemonic = if config.reveal_secrets {
        report.mnemonic.as_str().to_string()
    } else {
        redact_mnemonic(report.mnemonic.as_str())
    };
    println!("Mnemonic: {}", mnemonic);

    for wallet in &report.wallets {
        let private_key = if config.reveal_secrets {
            wallet.private_key.clone()
        } else {
            redact_hex_string(&wallet.private_key, 4)
        };

        println!();
        println!("[{}]", wallet.chain.config().name);
        println!("Derived Path: {}", wallet.derivation_path);
        println!("Private Key: {}", private_key);
        println!("Address: {}", wallet.address);
    }

    Ok(())
}
