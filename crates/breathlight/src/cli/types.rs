//! `types` subcommand: list the light types this device services.

use super::{LightType, Result, TypeJson, TypesOutput, kv_indent, kv_width, print_json};
use breathlight_lib::state::SUPPORTED_TYPES;

/// Every platform id, in id order.
const ALL_IDS: std::ops::RangeInclusive<i32> = 0..=7;

fn unsupported_types() -> Vec<LightType> {
    ALL_IDS
        .filter_map(LightType::from_id)
        .filter(|t| !t.is_supported())
        .collect()
}

fn type_json(t: LightType) -> TypeJson {
    TypeJson {
        name: t.name(),
        id: t.id(),
    }
}

pub(super) fn cmd_types(json: bool) -> Result<()> {
    let unsupported = unsupported_types();

    if json {
        return print_json(&TypesOutput {
            supported: SUPPORTED_TYPES.iter().copied().map(type_json).collect(),
            unsupported: unsupported.into_iter().map(type_json).collect(),
        });
    }

    let names: Vec<&str> = SUPPORTED_TYPES
        .iter()
        .chain(unsupported.iter())
        .map(|t| t.name())
        .collect();
    let w = kv_width(&[], &names);

    println!("Supported (priority order):");
    for t in SUPPORTED_TYPES {
        kv_indent(t.name(), format_args!("id {}", t.id()), w);
    }
    println!();
    println!("Not supported:");
    for t in &unsupported {
        kv_indent(t.name(), format_args!("id {}", t.id()), w);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_are_the_remaining_ids() {
        assert_eq!(
            unsupported_types(),
            vec![LightType::Keyboard, LightType::Bluetooth, LightType::Wifi]
        );
    }

    #[test]
    fn cmd_types_succeeds() {
        assert!(cmd_types(false).is_ok());
        assert!(cmd_types(true).is_ok());
    }
}
