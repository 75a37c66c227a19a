//
// wt1.rs: WT1 (ADC weight) cell parser
//
// A WT1 cell assigns a 4-bit weight to one or more ADC channels. Three
// textual forms are accepted, tried in this order:
//
//   c0=7, c1:5     channel-pair form ('c'/'C' prefix on the key optional)
//   7,5,3,1        list form, channel = position in the list
//   7              scalar form, broadcast to every target channel
//
// Numbers may be decimal or 0x-prefixed hex. A single bad token rejects
// the whole cell.
//

use std::collections::BTreeMap;

use crate::errors::ErrorCode;

// Largest weight an ADC channel register takes.
pub const MAX_VALUE: u8 = 15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelSpec {
    // Same weight for every channel the planner targets.
    Broadcast(u8),
    // Explicit channel -> weight assignments.
    PerChannel(BTreeMap<u32, u8>),
}

// Parse a WT1 cell. Ok(None) means the cell is empty, which is not an
// error: whether a spec is required is the validator's business.
pub fn parse(text: &str) -> Result<Option<ChannelSpec>, ErrorCode> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let spec = if text.contains(|c: char| c == ':' || c == '=') {
        parse_pairs(text)?
    } else if text.contains(|c: char| c == ',' || c.is_whitespace()) {
        parse_list(text)?
    } else {
        ChannelSpec::Broadcast(parse_value(text)?)
    };

    Ok(Some(spec))
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

fn parse_pairs(text: &str) -> Result<ChannelSpec, ErrorCode> {
    let mut map = BTreeMap::new();
    for token in tokens(text) {
        let bad_token = || ErrorCode::BadChannelToken {
            token: token.to_string(),
        };

        let split = token.find(|c: char| c == ':' || c == '=').ok_or_else(bad_token)?;
        let (key, value) = (&token[..split], &token[split + 1..]);
        let key = key
            .strip_prefix('c')
            .or_else(|| key.strip_prefix('C'))
            .unwrap_or(key);
        if key.is_empty() || value.is_empty() {
            return Err(bad_token());
        }

        let channel = parse_int(key)?;
        if channel > u64::from(u32::MAX) {
            return Err(bad_token());
        }
        // Last assignment to a channel wins.
        map.insert(channel as u32, parse_value(value)?);
    }
    Ok(ChannelSpec::PerChannel(map))
}

fn parse_list(text: &str) -> Result<ChannelSpec, ErrorCode> {
    let map = (0..)
        .zip(tokens(text))
        .map(|(channel, token)| -> Result<(u32, u8), ErrorCode> {
            Ok((channel, parse_value(token)?))
        })
        .collect::<Result<BTreeMap<u32, u8>, ErrorCode>>()?;
    if map.is_empty() {
        return Err(ErrorCode::EmptyList);
    }
    Ok(ChannelSpec::PerChannel(map))
}

fn parse_value(text: &str) -> Result<u8, ErrorCode> {
    let value = parse_int(text)?;
    if value > u64::from(MAX_VALUE) {
        return Err(ErrorCode::ValueOutOfRange { value });
    }
    Ok(value as u8)
}

// Decimal, or hex with a 0x/0X prefix.
pub fn parse_int(text: &str) -> Result<u64, ErrorCode> {
    let res = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    };
    res.map_err(|_| ErrorCode::BadNumber {
        text: text.to_string(),
    })
}
