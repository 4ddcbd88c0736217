use anyhow::Result;
use bagbench::SuiteConfig;

pub fn handle_show_config(suite: &SuiteConfig) -> Result<()> {
    print!("{}", suite.to_toml_string()?);
    Ok(())
}
