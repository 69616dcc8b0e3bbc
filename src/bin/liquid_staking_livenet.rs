//! Livenet deploy and keeper binary for the liquid staking protocol.
//!
//! Run with:
//! - Deploy and wire:   LS_LIVENET_MODE=deploy cargo run --bin liquid_staking_livenet --features=livenet
//! - Keeper action:     LS_LIVENET_MODE=keeper LS_KEEPER_ACTION=delegate|push_yield|harvest LS_EXISTING_VAULT=... cargo run ...
//! - Query pool state:  LS_LIVENET_MODE=query LS_EXISTING_VAULT=... cargo run ...
//!
//! Required environment variables (Odra livenet):
//! - ODRA_CASPER_LIVENET_SECRET_KEY_PATH
//! - ODRA_CASPER_LIVENET_NODE_ADDRESS
//! - ODRA_CASPER_LIVENET_EVENTS_URL
//! - ODRA_CASPER_LIVENET_CHAIN_NAME
//!
//! Optional:
//! - DEFAULT_VALIDATOR_PUBLIC_KEY            (hex public key with 01/02 prefix)
//! - ODRA_CASPER_LIVENET_DEPLOY_GAS          (motes, per contract)
//! - ODRA_CASPER_LIVENET_CALL_GAS            (motes)
//! - LS_TREASURY                             (defaults to the caller)
//! - LS_KEEPER                               (defaults to the caller)
//! - LS_STAKING_FEE_BPS                      (default: 50)
//! - LS_REWARDS_UNLOCK_TIME                  (unix seconds, default: 0)
//! - LS_BOOST_MIN_RATE_BPS / LS_BOOST_MAX_RATE_BPS / LS_BOOST_TARGET_CSPR
//! - LS_OBSERVED_YIELD_MOTES                 (for push_yield)

use odra::casper_types::{U256, U512};
use odra::host::{Deployer, HostEnv, HostRef, HostRefLoader};
use odra::prelude::*;

use liquid_staking_casper::boost::{BoostEngine, BoostEngineInitArgs};
use liquid_staking_casper::config::{ProtocolConfig, ProtocolConfigInitArgs};
use liquid_staking_casper::receipt::{ReceiptToken, ReceiptTokenInitArgs};
use liquid_staking_casper::registry::{UnbondingRegistry, UnbondingRegistryInitArgs};
use liquid_staking_casper::types::Role;
use liquid_staking_casper::vault::{LiquidVault, LiquidVaultHostRef, LiquidVaultInitArgs};

const MOTES_PER_CSPR: u64 = 1_000_000_000;

const DEFAULT_VALIDATOR_PUBLIC_KEY: &str =
    "012b365e09c5d75187b4abc25c4aa28109133bab6a256ef4abe24348073e590d80";

const DEFAULT_DEPLOY_GAS_MOTES: u64 = 500_000_000_000; // 500 CSPR
const DEFAULT_CALL_GAS_MOTES: u64 = 50_000_000_000; // 50 CSPR

struct Deployment {
    config: Address,
    receipt: Address,
    registry: Address,
    boost: Address,
    vault: Address,
}

fn main() {
    let env = odra_casper_livenet_env::env();
    let mode = std::env::var("LS_LIVENET_MODE").unwrap_or_else(|_| "deploy".to_string());

    println!("[INFO] Mode: {}", mode);
    println!("[INFO] Caller: {:?}", env.caller());

    match mode.as_str() {
        "deploy" => {
            let validator_public_key = std::env::var("DEFAULT_VALIDATOR_PUBLIC_KEY")
                .unwrap_or_else(|_| DEFAULT_VALIDATOR_PUBLIC_KEY.to_string());
            let deployment = deploy(&env, validator_public_key.clone());
            output_deploy_json(&deployment, &validator_public_key);
        }
        "keeper" => {
            let mut vault = load_vault(&env);
            env.set_gas(read_u64_env("ODRA_CASPER_LIVENET_CALL_GAS", DEFAULT_CALL_GAS_MOTES));
            run_keeper_action(&mut vault);
            print_liquidity(&vault);
        }
        "query" => {
            let vault = load_vault(&env);
            print_liquidity(&vault);
        }
        other => panic!("Unknown LS_LIVENET_MODE: {}", other),
    }
}

// ==========================================
// Deploy
// ==========================================

fn deploy(env: &HostEnv, validator_public_key: String) -> Deployment {
    let deployer = env.caller();
    let deploy_gas = read_u64_env("ODRA_CASPER_LIVENET_DEPLOY_GAS", DEFAULT_DEPLOY_GAS_MOTES);
    let call_gas = read_u64_env("ODRA_CASPER_LIVENET_CALL_GAS", DEFAULT_CALL_GAS_MOTES);
    let treasury = read_address_env("LS_TREASURY").unwrap_or(deployer);
    let keeper = read_address_env("LS_KEEPER").unwrap_or(deployer);

    println!("[STEP 1] Deploying protocol config...");
    env.set_gas(deploy_gas);
    let mut config = ProtocolConfig::deploy(
        env,
        ProtocolConfigInitArgs {
            treasury,
            staking_fee_bps: read_u64_env("LS_STAKING_FEE_BPS", 50),
        },
    );
    println!("[OK] Config: {:?}", config.address());

    println!("[STEP 2] Deploying sCSPR, registry and boost with the deployer as controller...");
    env.set_gas(deploy_gas);
    let mut receipt = ReceiptToken::deploy(env, ReceiptTokenInitArgs { minter: deployer });
    env.set_gas(deploy_gas);
    let mut registry = UnbondingRegistry::deploy(env, UnbondingRegistryInitArgs { vault: deployer });
    env.set_gas(deploy_gas);
    let target_cspr = read_u64_env("LS_BOOST_TARGET_CSPR", 1_000_000);
    let mut boost = BoostEngine::deploy(
        env,
        BoostEngineInitArgs {
            vault: deployer,
            receipt: receipt.address(),
            min_rate_bps: read_u64_env("LS_BOOST_MIN_RATE_BPS", 200),
            max_rate_bps: read_u64_env("LS_BOOST_MAX_RATE_BPS", 1_500),
            target_utilization: U256::from(target_cspr) * U256::from(MOTES_PER_CSPR),
        },
    );
    println!("[OK] sCSPR: {:?}", receipt.address());
    println!("[OK] Registry: {:?}", registry.address());
    println!("[OK] Boost: {:?}", boost.address());

    println!("[STEP 3] Deploying vault...");
    env.set_gas(deploy_gas);
    let vault = LiquidVault::deploy(
        env,
        LiquidVaultInitArgs {
            config: config.address(),
            receipt: receipt.address(),
            registry: registry.address(),
            boost: boost.address(),
            validator_public_key,
            rewards_unlock_time: read_u64_env("LS_REWARDS_UNLOCK_TIME", 0),
        },
    );
    println!("[OK] Vault: {:?}", vault.address());
    println!("     Config deadline: {}", vault.config_deadline());

    println!("[STEP 4] Handing control to the vault...");
    env.set_gas(call_gas);
    receipt.set_minter(vault.address());
    env.set_gas(call_gas);
    registry.set_vault(vault.address());
    env.set_gas(call_gas);
    boost.set_vault(vault.address());
    env.set_gas(call_gas);
    config.grant_role(Role::Keeper, keeper);
    println!("[OK] Minter: {:?}", receipt.minter());
    println!("[OK] Keeper: {:?}", keeper);

    Deployment {
        config: config.address(),
        receipt: receipt.address(),
        registry: registry.address(),
        boost: boost.address(),
        vault: vault.address(),
    }
}

// ==========================================
// Keeper
// ==========================================

fn run_keeper_action(vault: &mut LiquidVaultHostRef) {
    let action = std::env::var("LS_KEEPER_ACTION").unwrap_or_else(|_| "delegate".to_string());
    println!("[STEP] Keeper action: {}", action);
    match action.as_str() {
        "delegate" => vault.trigger_delegation(),
        "push_yield" => {
            let observed = read_u64_env("LS_OBSERVED_YIELD_MOTES", 0);
            vault.push_observed_yield(U512::from(observed));
        }
        "harvest" => vault.harvest_yield(),
        other => panic!("Unknown LS_KEEPER_ACTION: {}", other),
    }
    println!("[OK] {} done", action);
}

fn print_liquidity(vault: &LiquidVaultHostRef) {
    let liquidity = vault.liquidity();
    println!(
        r#"LS_POOL_JSON={{"exchange_rate":"{}","liquid":"{}","delegated":"{}","unbonding":"{}","reserved_rewards":"{}","unclaimed_yield":"{}","total_principal":"{}"}}"#,
        vault.exchange_rate(),
        liquidity.liquid,
        liquidity.delegated,
        liquidity.unbonding,
        liquidity.reserved_rewards,
        liquidity.unclaimed_yield,
        vault.total_principal()
    );
}

// ==========================================
// Helpers
// ==========================================

fn load_vault(env: &HostEnv) -> LiquidVaultHostRef {
    let raw = std::env::var("LS_EXISTING_VAULT")
        .unwrap_or_else(|_| panic!("LS_EXISTING_VAULT must be set"));
    LiquidVault::load(env, parse_contract_address(&raw))
}

fn read_u64_env(name: &str, default_value: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw.trim().replace('_', "").parse::<u64>().unwrap_or(default_value),
        Err(_) => default_value,
    }
}

fn read_address_env(name: &str) -> Option<Address> {
    std::env::var(name)
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_contract_address(&raw))
}

fn output_deploy_json(deployment: &Deployment, validator_public_key: &str) {
    let chain_name = std::env::var("ODRA_CASPER_LIVENET_CHAIN_NAME")
        .unwrap_or_else(|_| "casper-test".to_string());
    println!(
        r#"LS_DEPLOY_JSON={{"chain_name":"{}","config":"{}","receipt":"{}","registry":"{}","boost":"{}","vault":"{}","validator_public_key":"{}","deployed_at":"{}"}}"#,
        chain_name,
        format_address_hash(&deployment.config),
        format_address_hash(&deployment.receipt),
        format_address_hash(&deployment.registry),
        format_address_hash(&deployment.boost),
        format_address_hash(&deployment.vault),
        validator_public_key,
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
}

/// Hex of the 32 hash bytes inside an address' debug form
fn format_address_hash(addr: &Address) -> String {
    let debug_str = format!("{:?}", addr);
    match (debug_str.find('['), debug_str.rfind(']')) {
        (Some(start), Some(end)) if start < end => debug_str[start + 1..end]
            .split(", ")
            .filter_map(|part| part.strip_prefix("0x").or_else(|| part.strip_prefix("0X")))
            .collect(),
        _ => debug_str,
    }
}

/// Accepts `account-hash-`, `contract-package-`, `package-`, `hash-` or bare 64-hex.
fn parse_contract_address(raw: &str) -> Address {
    use odra::casper_types::account::AccountHash;
    use odra::casper_types::contracts::ContractPackageHash;

    fn decode_hex_32(s: &str) -> [u8; 32] {
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            panic!("Invalid address hash (expected 64 hex): {}", s);
        }
        let mut out = [0u8; 32];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .unwrap_or_else(|_| panic!("Invalid hex in address: {}", s));
        }
        out
    }

    let trimmed = raw.trim();
    if let Some(hex) = trimmed.strip_prefix("account-hash-") {
        return Address::Account(AccountHash::new(decode_hex_32(hex)));
    }
    let hex = ["contract-package-", "package-", "hash-"]
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);
    Address::Contract(ContractPackageHash::new(decode_hex_32(hex)))
}
