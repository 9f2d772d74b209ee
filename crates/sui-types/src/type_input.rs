//! Parsing of Move type strings typed into type-argument fields.
//!
//! Accepts the source-level spelling users write by hand:
//! - primitives: `bool`, `u8` .. `u256`, `address`, `signer`
//! - vectors: `vector<T>`
//! - structs: `0x2::coin::Coin<0x2::sui::SUI>`
//!
//! Errors carry a short reason suitable for a readiness report.

use move_core_types::identifier::Identifier;
use move_core_types::language_storage::{StructTag, TypeTag};

use crate::address::parse_address;

/// Parse a Move type string into a [`TypeTag`].
///
/// ```
/// use sui_ptb_types::type_input::parse_type_input;
///
/// assert!(parse_type_input("0x2::coin::Coin<0x2::sui::SUI>").is_ok());
/// assert!(parse_type_input("vector<u8").is_err());
/// ```
pub fn parse_type_input(input: &str) -> Result<TypeTag, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty type".to_string());
    }

    match input {
        "bool" => return Ok(TypeTag::Bool),
        "u8" => return Ok(TypeTag::U8),
        "u16" => return Ok(TypeTag::U16),
        "u32" => return Ok(TypeTag::U32),
        "u64" => return Ok(TypeTag::U64),
        "u128" => return Ok(TypeTag::U128),
        "u256" => return Ok(TypeTag::U256),
        "address" => return Ok(TypeTag::Address),
        "signer" => return Ok(TypeTag::Signer),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix("vector<") {
        let inner = rest
            .strip_suffix('>')
            .ok_or_else(|| format!("unterminated vector type: {}", input))?;
        return Ok(TypeTag::Vector(Box::new(parse_type_input(inner)?)));
    }

    let (path, generics) = match input.find('<') {
        Some(pos) => {
            let generics = input[pos + 1..]
                .strip_suffix('>')
                .ok_or_else(|| format!("unterminated type arguments: {}", input))?;
            (&input[..pos], Some(generics))
        }
        None => (input, None),
    };

    let parts: Vec<&str> = path.split("::").map(str::trim).collect();
    let [address, module, name] = parts.as_slice() else {
        return Err(format!("expected address::module::Name, got {}", path));
    };
    let address = parse_address(address).ok_or_else(|| format!("invalid address: {}", address))?;
    let module = Identifier::new(*module).map_err(|_| format!("invalid module name: {}", module))?;
    let name = Identifier::new(*name).map_err(|_| format!("invalid struct name: {}", name))?;

    let type_params = match generics {
        Some(list) => split_top_level(list)?
            .into_iter()
            .map(parse_type_input)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(TypeTag::Struct(Box::new(StructTag {
        address,
        module,
        name,
        type_params,
    })))
}

/// Split `A, B<C, D>, E` on the commas that are not nested in brackets.
fn split_top_level(list: &str) -> Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced brackets: {}", list))?;
            }
            ',' if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(format!("unbalanced brackets: {}", list));
    }
    parts.push(list[start..].trim());
    Ok(parts)
}
