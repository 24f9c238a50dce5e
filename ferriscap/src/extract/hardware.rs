//! Hardware inventory extractors: cards, PICs, electronic labels, ESN and
//! optical transceivers.

use once_cell::sync::Lazy;
use regex::Regex;

use super::fields::{
    Header, assign, builtin_regex, cell_at, find_header, first_capture, labeled, table_rows,
    to_float, to_int,
};
use crate::capture::Chunk;
use crate::error::ExtractError;
use crate::model::{Card, Elabel, Model, Pic, Sfp};

static DEVICE_TITLE: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?im)^\s*(\S+)'s\s+Device\s+status"));
static ESN: Lazy<Regex> = Lazy::new(|| builtin_regex(r"(?im)^\s*ESN[^:\n]*:\s*(\S+)"));
static ELABEL_UNIT: Lazy<Regex> = Lazy::new(|| builtin_regex(r"^\s*\[([^\[\]\s]+)\]\s*$"));
static TRANSCEIVER_BLOCK: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)^\s*(\S+)\s+transceiver\s+information\s*:?\s*$"));

/// `display device`: one card per slot row; also picks up the chassis model.
pub fn extract_device(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["slot", "type", "status"]).ok_or(
        ExtractError::MissingHeader {
            expected: "Slot Type Status",
        },
    )?;
    let header = Header::parse(lines[h]);
    let slot = header.index(&["slot"]);
    let sub = header.index(&["sub"]);
    let card_type = header.index(&["type"]);
    let online = header.index(&["online"]);
    let register = header.index(&["register"]);
    let status = header.index(&["status"]);
    let role = header.index(&["role"]);

    assign(
        &mut model.identity.model,
        first_capture(&chunk.body, &[&*DEVICE_TITLE]),
    );

    for row in table_rows(&lines, h, 4) {
        let Some(mut slot) = cell_at(&row, slot) else {
            continue;
        };
        if let Some(sub) = cell_at(&row, sub) {
            slot = format!("{slot}/{sub}");
        }
        model.hardware.cards.push(Card {
            slot,
            card_type: cell_at(&row, card_type),
            online: cell_at(&row, online),
            register: cell_at(&row, register),
            status: cell_at(&row, status),
            role: cell_at(&row, role),
        });
    }
    Ok(())
}

/// `display device pic-status`
pub fn extract_pics(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["slot", "pic", "status"]).ok_or(
        ExtractError::MissingHeader {
            expected: "SLOT PIC Status",
        },
    )?;
    let header = Header::parse(lines[h]);
    let slot = header.index(&["slot"]);
    let pic = header.index(&["pic"]);
    let status = header.index(&["status"]);
    let pic_type = header.index(&["type"]);
    let ports = header.index(&["port_count", "port"]);

    for row in table_rows(&lines, h, 4) {
        let (Some(slot), Some(pic)) = (cell_at(&row, slot), cell_at(&row, pic)) else {
            continue;
        };
        model.hardware.pics.push(Pic {
            slot: format!("{slot}/{pic}"),
            status: cell_at(&row, status),
            pic_type: cell_at(&row, pic_type),
            port_count: cell_at(&row, ports).and_then(|v| to_int(&v)),
        });
    }
    Ok(())
}

/// `display elabel`: one label per `[Unit]` section holding board data.
///
/// Sub-sections such as `[Board Properties]` belong to the enclosing unit.
/// The backplane bar code doubles as the chassis serial when no ESN was seen.
pub fn extract_elabels(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let mut units: Vec<(String, String)> = Vec::new();
    for line in chunk.lines() {
        if let Some(caps) = ELABEL_UNIT.captures(line) {
            units.push((caps[1].to_string(), String::new()));
            continue;
        }
        if line.trim_start().starts_with("/$") {
            continue;
        }
        if units.is_empty() {
            units.push((String::new(), String::new()));
        }
        if let Some((_, text)) = units.last_mut() {
            text.push_str(line);
            text.push('\n');
        }
    }

    for (slot, text) in units {
        let bar_code = labeled(&text, &["BarCode", "Bar Code"]).filter(|v| !v.is_empty());
        let board_type = labeled(&text, &["BoardType", "Board Type"]).filter(|v| !v.is_empty());
        if bar_code.is_none() && board_type.is_none() {
            continue;
        }

        if slot.to_lowercase().starts_with("backplane") && model.identity.serial.is_none() {
            model.identity.serial = bar_code.clone();
        }
        model.hardware.elabels.push(Elabel {
            slot,
            board_type,
            bar_code,
            item: labeled(&text, &["Item"]),
            description: labeled(&text, &["Description"]),
            manufactured: labeled(&text, &["Manufactured"]),
            vendor: labeled(&text, &["VendorName", "Vendor Name"]),
        });
    }
    Ok(())
}

/// `display esn`: chassis serial number.
pub fn extract_esn(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let esn = first_capture(&chunk.body, &[&*ESN]).ok_or_else(|| ExtractError::Malformed {
        message: "no ESN line".to_string(),
    })?;
    model.identity.serial = Some(esn);
    Ok(())
}

/// `display interface transceiver verbose`, `display transceiver ...` and
/// `display optical-module brief`.
///
/// Verbose output comes as per-interface blocks; the brief form is a table.
pub fn extract_transceivers(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let mut blocks: Vec<(String, String)> = Vec::new();
    for line in chunk.lines() {
        if let Some(caps) = TRANSCEIVER_BLOCK.captures(line) {
            blocks.push((caps[1].to_string(), String::new()));
        } else if let Some((_, text)) = blocks.last_mut() {
            text.push_str(line);
            text.push('\n');
        }
    }

    if !blocks.is_empty() {
        for (interface, text) in blocks {
            model.hardware.sfps.push(Sfp {
                interface,
                transceiver_type: labeled(&text, &["Transceiver Type"]),
                vendor: labeled(&text, &["Vendor Name"]),
                serial: labeled(&text, &["Serial Number", "Vendor Serial Number"]),
                wavelength_nm: labeled(&text, &["Wavelength", "WaveLength"])
                    .and_then(|v| to_int(&v)),
                distance: labeled(&text, &["Transfer Distance"]),
                rx_power_dbm: labeled(&text, &["Current Rx Power", "Rx Power", "RxPower"])
                    .and_then(|v| to_float(&v)),
                tx_power_dbm: labeled(&text, &["Current Tx Power", "Tx Power", "TxPower"])
                    .and_then(|v| to_float(&v)),
            });
        }
        return Ok(());
    }

    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["port", "rxpower"]).ok_or(ExtractError::MissingHeader {
        expected: "transceiver information",
    })?;
    let header = Header::parse(lines[h]);
    let port = header.index(&["port"]);
    let kind = header.index(&["type"]);
    let wavelength = header.index(&["wavelength"]);
    let rx = header.index(&["rxpower"]);
    let tx = header.index(&["txpower"]);
    let vendor = header.index(&["vendorname"]);

    for row in table_rows(&lines, h, 4) {
        let Some(interface) = cell_at(&row, port) else {
            continue;
        };
        model.hardware.sfps.push(Sfp {
            interface,
            transceiver_type: cell_at(&row, kind),
            vendor: cell_at(&row, vendor),
            serial: None,
            wavelength_nm: cell_at(&row, wavelength).and_then(|v| to_int(&v)),
            distance: None,
            rx_power_dbm: cell_at(&row, rx).and_then(|v| to_float(&v)),
            tx_power_dbm: cell_at(&row, tx).and_then(|v| to_float(&v)),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        extract: fn(&Chunk, &mut Model) -> Result<(), ExtractError>,
        label: &str,
        body: &str,
    ) -> Model {
        let mut model = Model::new();
        extract(&Chunk::from_parts(label, body), &mut model).unwrap();
        model
    }

    #[test]
    fn test_device_vrp8() {
        let body = "\
NE40E-X8A's Device status:
Slot #    Type     Online    Register     Status   Role  LsId   Primary
-------------------------------------------------------------------------
1         LPU      Present   Registered   Normal   LS    1      NA
9         MPU      Present   NA           Normal   MMB   0      Master
";
        let model = run(extract_device, "display device", body);
        assert_eq!(model.identity.model.as_deref(), Some("NE40E-X8A"));

        let cards = &model.hardware.cards;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].slot, "1");
        assert_eq!(cards[0].card_type.as_deref(), Some("LPU"));
        assert_eq!(cards[0].register.as_deref(), Some("Registered"));
        assert_eq!(cards[1].role.as_deref(), Some("MMB"));
    }

    #[test]
    fn test_device_switch_with_subslot() {
        let body = "\
S5720-28X-SI-AC's Device status:
Slot Sub  Type                   Online    Power    Register     Status   Role
-------------------------------------------------------------------------------
0    -    S5720-28X-SI           Present   PowerOn  Registered   Normal   Master
0    1    ES5D21X04S01           Present   PowerOn  Registered   Normal   NA
";
        let model = run(extract_device, "display device", body);
        let cards = &model.hardware.cards;
        assert_eq!(cards[0].slot, "0");
        assert_eq!(cards[1].slot, "0/1");
        assert_eq!(cards[0].status.as_deref(), Some("Normal"));
        assert_eq!(cards[0].role.as_deref(), Some("Master"));
    }

    #[test]
    fn test_device_without_table_fails() {
        let mut model = Model::new();
        let chunk = Chunk::from_parts("display device", "Error: Wrong parameter\n");
        assert!(matches!(
            extract_device(&chunk, &mut model),
            Err(ExtractError::MissingHeader { .. })
        ));
    }

    #[test]
    fn test_pics() {
        let body = "\
Pic-status information in Chassis 1:
--------------------------------------------------------------------
SLOT PIC  Status       Type                  Port_count Init_result Logic_down
1    0    Registered   ETH_10XGF_CARD        10         SUCCESS     SUCCESS
";
        let model = run(extract_pics, "display device pic-status", body);
        let pic = &model.hardware.pics[0];
        assert_eq!(pic.slot, "1/0");
        assert_eq!(pic.status.as_deref(), Some("Registered"));
        assert_eq!(pic.pic_type.as_deref(), Some("ETH_10XGF_CARD"));
        assert_eq!(pic.port_count, Some(10));
    }

    #[test]
    fn test_elabels() {
        let body = "\
[Slot_1]
/$[Board Integration Version]
/$BoardIntegrationVersion=3.0

[Board Properties]
BoardType=CR5D00E4XF80
BarCode=030PVD10B4000123
Item=03030PVD
Description=Huawei NE40E 10x10GE line card
Manufactured=2020-01-01
VendorName=Huawei

[Backplane_1]
[Board Properties]
BoardType=CR5BBPAX8A
BarCode=2102113089P0000001
";
        let model = run(extract_elabels, "display elabel", body);
        let labels = &model.hardware.elabels;
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].slot, "Slot_1");
        assert_eq!(labels[0].board_type.as_deref(), Some("CR5D00E4XF80"));
        assert_eq!(labels[0].item.as_deref(), Some("03030PVD"));
        assert_eq!(labels[0].vendor.as_deref(), Some("Huawei"));
        assert_eq!(labels[1].slot, "Backplane_1");
        assert_eq!(model.identity.serial.as_deref(), Some("2102113089P0000001"));
    }

    #[test]
    fn test_esn() {
        let model = run(extract_esn, "display esn", "ESN of master: 2102351931P0ABCDEF01\n");
        assert_eq!(model.identity.serial.as_deref(), Some("2102351931P0ABCDEF01"));
    }

    #[test]
    fn test_transceiver_verbose() {
        let body = "\
 GigabitEthernet0/0/1 transceiver information:
-------------------------------------------------------------
 Common information:
   Transceiver Type                      :1000_BASE_LX_SFP
   Connector Type                        :LC
   Wavelength(nm)                        :1310
   Transfer Distance(m)                  :10000(9um)
   Vendor Name                           :HUAWEI
   Serial Number                         :HA12345678
 Diagnostic information:
   Current Rx Power(dBm)                 :-5.23
   Current Tx Power(dBm)                 :-6.01
 GigabitEthernet0/0/2 transceiver information:
   Transceiver Type                      :10GBASE_SR_SFP
";
        let model = run(
            extract_transceivers,
            "display interface transceiver verbose",
            body,
        );
        let sfps = &model.hardware.sfps;
        assert_eq!(sfps.len(), 2);
        assert_eq!(sfps[0].interface, "GigabitEthernet0/0/1");
        assert_eq!(sfps[0].transceiver_type.as_deref(), Some("1000_BASE_LX_SFP"));
        assert_eq!(sfps[0].wavelength_nm, Some(1310));
        assert_eq!(sfps[0].distance.as_deref(), Some("10000(9um)"));
        assert_eq!(sfps[0].serial.as_deref(), Some("HA12345678"));
        assert_eq!(sfps[0].rx_power_dbm, Some(-5.23));
        assert_eq!(sfps[0].tx_power_dbm, Some(-6.01));
        assert_eq!(sfps[1].rx_power_dbm, None);
    }

    #[test]
    fn test_optical_module_table() {
        let body = "\
Port             Status Duplex   Type     WaveLength RxPower  TxPower  Mode        VendorPN
GE0/0/1          up     full     1000BASE 1310nm     -5.23dBm -6.01dBm SingleMode  34060286
";
        let model = run(extract_transceivers, "display optical-module brief", body);
        let sfp = &model.hardware.sfps[0];
        assert_eq!(sfp.interface, "GE0/0/1");
        assert_eq!(sfp.wavelength_nm, Some(1310));
        assert_eq!(sfp.rx_power_dbm, Some(-5.23));
        assert_eq!(sfp.tx_power_dbm, Some(-6.01));
    }
}
