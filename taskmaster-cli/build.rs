use serde::Deserialize;
use std::fs;

#[derive(Deserialize)]
struct Config {
    package: Package,
}

#[derive(Deserialize)]
struct Package {
    metadata: Metadata,
}

#[derive(Deserialize)]
struct Metadata {
    taskmaster: TaskmasterConfig,
}

#[derive(Deserialize)]
struct TaskmasterConfig {
    codename: String,
}

fn main() {
    let toml_str = fs::read_to_string("Cargo.toml").expect("Failed to read Cargo.toml");

    let config: Config = toml::from_str(&toml_str).expect("Failed to parse Cargo.toml");

    let codename = config.package.metadata.taskmaster.codename;

    println!("cargo:rustc-env=CODENAME={}", codename);
    println!("cargo:rerun-if-changed=Cargo.toml");
}
