//! Audio output device listing.

use crate::cli::common::{print_json, CliResult};
use crate::playback;
use clap::Args;
use serde::Serialize;

/// List audio output devices
#[derive(Debug, Clone, Args)]
pub struct DevicesArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DeviceItem {
    name: String,
    default: bool,
}

#[derive(Debug, Serialize)]
struct DevicesResponse {
    devices: Vec<DeviceItem>,
    count: usize,
}

impl DevicesArgs {
    /// Execute the devices command
    pub fn execute(&self) -> CliResult<()> {
        let default = playback::default_output_device();
        let devices: Vec<DeviceItem> = playback::list_output_devices()?
            .into_iter()
            .map(|name| DeviceItem {
                default: default.as_deref() == Some(name.as_str()),
                name,
            })
            .collect();

        let response = DevicesResponse {
            count: devices.len(),
            devices,
        };

        if self.json {
            print_json(&response)?;
        } else if response.count == 0 {
            println!("No audio output devices found.");
        } else {
            println!("Output devices ({}):", response.count);
            println!();
            for device in response.devices {
                let marker = if device.default { " (default)" } else { "" };
                println!("  {}{marker}", device.name);
            }
        }

        Ok(())
    }
}
