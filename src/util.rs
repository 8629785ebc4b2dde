use crate::definitions::Address;

/// Splits an address into the (high, low) byte pair in bus order.
pub fn split_address(address: Address) -> (u8, u8) {
    let values = address.to_be_bytes();
    (values[0], values[1])
}

pub fn parse_number(value: &str) -> Result<u32, String> {
    let value = value.trim();
    let parsed = if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)
    } else {
        value.parse::<u32>()
    };
    parsed.map_err(|e| format!("'{}' is not a number: {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_address_is_big_endian() {
        assert_eq!((0x13, 0x37), split_address(0x1337));
        assert_eq!((0x80, 0x00), split_address(0x8000));
        assert_eq!((0x00, 0xFF), split_address(0x00FF));
    }

    #[test]
    fn test_parse_number_accepts_hex_and_decimal() {
        assert_eq!(Ok(0x1337), parse_number("0x1337"));
        assert_eq!(Ok(4919), parse_number("4919"));
        assert_eq!(Ok(255), parse_number(" 0XFF "));
        assert!(parse_number("0xZZ").is_err());
        assert!(parse_number("twelve").is_err());
    }
}
