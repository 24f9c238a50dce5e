//! System extractors: software, clock, resources, alarms, licenses and
//! identity fields.

use once_cell::sync::Lazy;
use regex::Regex;

use super::fields::{
    Header, assign, builtin_regex, cell_at, columns, find_header, first_capture, is_separator,
    labeled, table_rows, to_float, to_int,
};
use crate::capture::Chunk;
use crate::error::ExtractError;
use crate::model::{
    Alarm, CpuSample, DiskSample, FanSample, License, MemorySample, Model, NtpServer, PowerSample,
    SshUser, TemperatureSample,
};

static SOFTWARE_VERSION: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)\bsoftware,?\s+Version\s+([0-9][\w.]*)"));
static ANY_VERSION: Lazy<Regex> = Lazy::new(|| builtin_regex(r"(?i)\bVersion\s+([0-9][\w.]*)"));
static RELEASE: Lazy<Regex> = Lazy::new(|| builtin_regex(r"\(\s*\S+\s+(V\d{3}R\d{3}\w*)\s*\)"));
static UPTIME: Lazy<Regex> = Lazy::new(|| builtin_regex(r"(?im)\buptime\s+is\s+(.+?)\s*$"));
static MODEL_LINE: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?im)^\s*(?:HUAWEI|Quidway)\s+(\S+).*\buptime\s+is"));

static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?m)^\s*(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}\S*)"));
static TIME_ZONE: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?im)^\s*Time\s*Zone\s*(?:\(([^)]*)\))?\s*:\s*(\S+)"));

static CPU_USAGE: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(r"(?i)CPU\s+Usage\s*:\s*([\d.]+)%(?:\s*Max\s*:\s*([\d.]+)%)?")
});
static CPU_AVERAGES: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(
        r"(?i)five\s+seconds\s*:\s*([\d.]+)%.*?one\s+minute\s*:\s*([\d.]+)%.*?five\s+minutes\s*:\s*([\d.]+)%",
    )
});
static LABEL_SLOT: Lazy<Regex> = Lazy::new(|| builtin_regex(r"(?i)\bslot\s+(\S+)"));
static LABEL_VRF: Lazy<Regex> = Lazy::new(|| builtin_regex(r"(?i)\bvpn-instance\s+(\S+)"));

static DIRECTORY: Lazy<Regex> = Lazy::new(|| builtin_regex(r"(?i)^\s*Directory of\s+(\S+)"));
static DISK_TOTAL: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(
        r"(?i)([\d,]+)\s*KB\s+total(?:\s+available)?\s*(?:\(\s*([\d,]+)\s*KB\s+free\s*\))?",
    )
});

static ALARM_ROW: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(
        r"(?i)^\s*(\d+)\s+(?:(0x[0-9a-f]+)\s+)?(critical|major|minor|warning|indeterminate|cleared)\s+(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2})(?:[+-]\d{2}:\d{2})?(?:\s+DST)?\s+(.+?)\s*$",
    )
});

static ROUTER_ID: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)router\s*id\s*(?:is)?\s*:?\s*(\d+\.\d+\.\d+\.\d+)"));
static MAC: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)\b([0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4})\b"));
static SSH_USER_LINE: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)^\s*User\s*Name\s*:\s*(\S+)"));
static NTP_SOURCE: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?im)^\s*clock\s+source\s*:\s*(\S+)"));

fn malformed(message: &str) -> ExtractError {
    ExtractError::Malformed {
        message: message.to_string(),
    }
}

/// Value of `slot N` in the command label, if the command was slot-scoped.
fn label_slot(chunk: &Chunk) -> Option<String> {
    first_capture(&chunk.label, &[&*LABEL_SLOT])
}

/// Value of `vpn-instance NAME` in the command label.
fn label_vrf(chunk: &Chunk) -> Option<String> {
    first_capture(&chunk.label, &[&*LABEL_VRF])
}

// ============================================================================
// Software & clock
// ============================================================================

/// `display version`: software version, release, uptime and model.
pub fn extract_version(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let version = first_capture(body, &[&*SOFTWARE_VERSION, &*ANY_VERSION]);
    let uptime = first_capture(body, &[&*UPTIME]);
    if version.is_none() && uptime.is_none() {
        return Err(malformed("no version or uptime line"));
    }

    assign(&mut model.software.version, version);
    assign(&mut model.software.uptime, uptime);
    assign(&mut model.software.release, first_capture(body, &[&*RELEASE]));
    assign(&mut model.identity.model, first_capture(body, &[&*MODEL_LINE]));
    Ok(())
}

/// `display clock`: current device time and time zone.
pub fn extract_clock(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let time = first_capture(body, &[&*CLOCK_TIME]);
    let zone = TIME_ZONE.captures(body).map(|caps| {
        let offset = caps.get(2).map_or("", |m| m.as_str());
        match caps.get(1).map(|m| m.as_str().trim()) {
            Some(name) if !name.is_empty() => format!("{name} {offset}"),
            _ => offset.to_string(),
        }
    });
    if time.is_none() && zone.is_none() {
        return Err(malformed("no date or time zone line"));
    }

    assign(&mut model.identity.current_time, time);
    assign(&mut model.identity.timezone, zone);
    Ok(())
}

// ============================================================================
// Resources
// ============================================================================

/// `display cpu-usage`: one sample per chunk.
pub fn extract_cpu(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let mut sample = CpuSample {
        slot: label_slot(chunk),
        ..Default::default()
    };

    if let Some(caps) = CPU_USAGE.captures(body) {
        sample.usage_percent = caps.get(1).and_then(|m| to_int(m.as_str()));
        sample.max_percent = caps.get(2).and_then(|m| to_int(m.as_str()));
    }
    if let Some(caps) = CPU_AVERAGES.captures(body) {
        sample.five_seconds = to_int(&caps[1]);
        sample.one_minute = to_int(&caps[2]);
        sample.five_minutes = to_int(&caps[3]);
    }
    if sample.usage_percent.is_none() && sample.five_seconds.is_none() {
        return Err(malformed("no CPU usage figures"));
    }
    if sample.usage_percent.is_none() {
        sample.usage_percent = sample.five_seconds;
    }

    model.resources.cpu.push(sample);
    Ok(())
}

/// `display memory-usage`: one sample per chunk.
pub fn extract_memory(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let total = labeled(body, &["System Total Memory Is", "System Total Memory"])
        .and_then(|v| to_int(&v));
    let used = labeled(body, &["Total Memory Used Is", "Total Memory Used"])
        .and_then(|v| to_int(&v));
    let percent = labeled(
        body,
        &["Memory Using Percentage Is", "Memory Using Percentage", "Memory Usage"],
    )
    .and_then(|v| to_int(&v));
    if total.is_none() && used.is_none() && percent.is_none() {
        return Err(malformed("no memory figures"));
    }

    let free = labeled(body, &["Total Memory Free Is", "Free Memory"])
        .and_then(|v| to_int(&v))
        .or_else(|| total.zip(used).map(|(t, u)| t - u));

    model.resources.memory.push(MemorySample {
        slot: label_slot(chunk),
        total_kb: total,
        used_kb: used,
        free_kb: free,
        usage_percent: percent,
    });
    Ok(())
}

/// `dir`: one sample per `KB total` line, tagged with the directory above it.
pub fn extract_disk(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let mut device: Option<String> = None;
    let mut found = false;

    for line in chunk.lines() {
        if let Some(caps) = DIRECTORY.captures(line) {
            device = Some(caps[1].to_string());
            continue;
        }
        if let Some(caps) = DISK_TOTAL.captures(line) {
            found = true;
            model.resources.disk.push(DiskSample {
                device: device.clone(),
                total_kb: to_int(&caps[1]),
                free_kb: caps.get(2).and_then(|m| to_int(m.as_str())),
            });
        }
    }

    if found { Ok(()) } else { Err(malformed("no storage totals")) }
}

/// `display power`
pub fn extract_power(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["mode", "state"]).ok_or(ExtractError::MissingHeader {
        expected: "Mode State",
    })?;
    let header = Header::parse(lines[h]);
    let slot = header.index(&["slot"]);
    let unit_col = header.index(&["powerid", "powerno", "power", "pwr"]);
    let present = header.index(&["present", "online"]);
    let mode = header.index(&["mode"]);
    let state = header.index(&["state", "status"]);

    for row in table_rows(&lines, h, 3) {
        let unit = cell_at(&row, unit_col).or_else(|| cell_at(&row, Some(0)));
        let Some(unit) = unit else {
            continue;
        };
        let id = match cell_at(&row, slot).filter(|_| slot != unit_col) {
            Some(slot) => format!("{slot}/{unit}"),
            None => unit,
        };
        model.resources.power.push(PowerSample {
            id,
            present: cell_at(&row, present),
            mode: cell_at(&row, mode),
            state: cell_at(&row, state),
        });
    }
    Ok(())
}

/// `display temperature`
pub fn extract_temperature(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["slot", "status"]).ok_or(ExtractError::MissingHeader {
        expected: "Slot Status",
    })?;
    let header = Header::parse(lines[h]);
    let slot = header.index(&["slot"]);
    let sensor = header.index(&["sensor", "pcb"]);
    let status = header.index(&["status"]);
    let current = header.index(&["current", "temp"]);

    for row in table_rows(&lines, h, 3) {
        let Some(slot) = cell_at(&row, slot) else {
            continue;
        };
        model.resources.temperature.push(TemperatureSample {
            slot,
            sensor: cell_at(&row, sensor),
            status: cell_at(&row, status),
            current_celsius: cell_at(&row, current).and_then(|v| to_float(&v)),
        });
    }
    Ok(())
}

/// `display fan`
pub fn extract_fans(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["slot", "speed"]).ok_or(ExtractError::MissingHeader {
        expected: "Slot Speed",
    })?;
    let header = Header::parse(lines[h]);
    let slot = header.index(&["slot"]);
    let fan = header.index(&["fanid"]);
    let present = header.index(&["present", "online"]);
    let status = header.index(&["status", "register"]);
    let speed = header.index(&["speed"]);

    for row in table_rows(&lines, h, 3) {
        let Some(mut unit) = cell_at(&row, slot) else {
            continue;
        };
        if let Some(fan) = cell_at(&row, fan) {
            unit = format!("{unit}/{fan}");
        }
        model.resources.fans.push(FanSample {
            slot: unit,
            present: cell_at(&row, present),
            status: cell_at(&row, status),
            speed: cell_at(&row, speed),
        });
    }
    Ok(())
}

// ============================================================================
// Alarms & licensing
// ============================================================================

/// `display alarm active|history|all`
///
/// Rows carry sequence, optional alarm ID, level, date and time; indented
/// lines after a row continue its description.
pub fn extract_alarms(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let label = chunk.label.to_lowercase();
    let state = if label.contains("history") {
        Some("history".to_string())
    } else if label.contains("active") {
        Some("active".to_string())
    } else {
        None
    };

    let mut current: Option<Alarm> = None;
    for line in chunk.lines() {
        if let Some(caps) = ALARM_ROW.captures(line) {
            model.alarms.extend(current.take());
            current = Some(Alarm {
                sequence: to_int(&caps[1]),
                alarm_id: caps.get(2).map(|m| m.as_str().to_string()),
                level: Some(caps[3].to_string()),
                state: state.clone(),
                date: Some(caps[4].to_string()),
                time: Some(caps[5].to_string()),
                description: caps[6].to_string(),
            });
            continue;
        }

        let continues = line.starts_with(char::is_whitespace)
            && !line.trim().is_empty()
            && !is_separator(line);
        match current.as_mut() {
            Some(alarm) if continues => {
                alarm.description.push(' ');
                alarm.description.push_str(line.trim());
            }
            _ => model.alarms.extend(current.take()),
        }
    }
    model.alarms.extend(current);
    Ok(())
}

/// `display license`: active file and state, plus one record per item row.
pub fn extract_licenses(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let file = labeled(body, &["Active License", "Active license file", "License file"]);
    let state = labeled(body, &["License state", "License State"]);

    let lines: Vec<&str> = chunk.lines().collect();
    let mut items = Vec::new();
    if let Some(h) = find_header(&lines, &["item name"]) {
        for line in &lines[h + 1..] {
            if line.trim().is_empty() || is_separator(line) {
                continue;
            }
            let Some(cols) = columns(line, 3) else {
                continue;
            };
            items.push(License {
                file: file.clone(),
                state: state.clone(),
                item: Some(cols[0].to_string()),
                value: cols.get(2).map(|v| v.to_string()),
                description: (cols.len() > 3).then(|| cols[3..].join(" ")),
            });
        }
    }

    if items.is_empty() {
        if file.is_none() && state.is_none() {
            return Err(malformed("no license file, state or items"));
        }
        items.push(License {
            file,
            state,
            ..Default::default()
        });
    }
    model.licenses.extend(items);
    Ok(())
}

/// `display patch-information`
///
/// A device that reports no patch gets an explicit empty string.
pub fn extract_patch(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let patch = labeled(body, &["Patch Package Version", "Patch version"])
        .filter(|v| !v.is_empty())
        .or_else(|| labeled(body, &["Patch Package Name"]).filter(|v| !v.is_empty()));

    match patch {
        Some(patch) => model.identity.patch = Some(patch),
        None if body.to_lowercase().contains("no patch") => {
            model.identity.patch = Some(String::new())
        }
        None => return Err(malformed("no patch package fields")),
    }
    Ok(())
}

/// `display startup`: next saved-configuration file.
pub fn extract_startup(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let saved = labeled(
        &chunk.body,
        &[
            "Next startup saved-configuration file",
            "Startup saved-configuration file",
        ],
    );
    if saved.is_none() {
        return Err(malformed("no saved-configuration file"));
    }
    assign(&mut model.identity.saved_config, saved);
    Ok(())
}

// ============================================================================
// Identity & access
// ============================================================================

/// `display ntp-service status|sessions`
///
/// Session listings add servers; status output fills the sync state.
pub fn extract_ntp(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let sources: Vec<String> = NTP_SOURCE
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect();

    if !sources.is_empty() {
        let vrf = label_vrf(chunk);
        model.ntp.servers.extend(sources.into_iter().map(|address| NtpServer {
            address,
            vrf: vrf.clone(),
        }));
        return Ok(());
    }

    let state = labeled(body, &["clock status"]);
    if state.is_none() {
        return Err(malformed("no clock status"));
    }
    assign(&mut model.ntp.sync_state, state);
    assign(
        &mut model.ntp.stratum,
        labeled(body, &["clock stratum"]).and_then(|v| to_int(&v)),
    );
    assign(&mut model.ntp.reference, labeled(body, &["reference clock ID"]));
    Ok(())
}

/// `display ssh user-information`: block or table layout.
pub fn extract_ssh_users(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let mut users: Vec<SshUser> = Vec::new();

    for line in &lines {
        if let Some(caps) = SSH_USER_LINE.captures(line) {
            users.push(SshUser {
                name: caps[1].to_string(),
                ..Default::default()
            });
        } else if let Some(user) = users.last_mut() {
            assign(
                &mut user.authentication_type,
                labeled(line, &["Authentication-type", "Authentication type"]),
            );
            assign(
                &mut user.service_type,
                labeled(line, &["Service-type", "Service type"]),
            );
        }
    }

    if users.is_empty() {
        if let Some(h) = find_header(&lines, &["user name", "service"]) {
            for row in table_rows(&lines, h, 3) {
                users.push(SshUser {
                    name: row[0].to_string(),
                    authentication_type: Some(row[1].to_string()),
                    service_type: row.last().map(|v| v.to_string()),
                });
            }
        }
    }

    model.identity.ssh_users.extend(users);
    Ok(())
}

/// `display router id [vpn-instance NAME]`
pub fn extract_router_id(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let router_id =
        first_capture(&chunk.body, &[&*ROUTER_ID]).ok_or_else(|| malformed("no router ID"))?;
    match label_vrf(chunk) {
        Some(vrf) => {
            model.identity.vrf_router_ids.insert(vrf, router_id);
        }
        None => model.identity.router_id = Some(router_id),
    }
    Ok(())
}

/// `display bridge mac-address` / `display system-mac`
pub fn extract_base_mac(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let mac = first_capture(&chunk.body, &[&*MAC]).ok_or_else(|| malformed("no MAC address"))?;
    model.identity.base_mac = Some(mac.to_lowercase());
    Ok(())
}
