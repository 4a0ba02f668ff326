//! Display glyphs for providers whose listing carries names only.

pub fn symbol_for(code: &str) -> &str {
    match code {
        "USD" | "AUD" | "CAD" | "NZD" | "SGD" | "HKD" | "MXN" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "ILS" => "₪",
        "PHP" => "₱",
        "THB" => "฿",
        "TRY" => "₺",
        "PLN" => "zł",
        "BRL" => "R$",
        "ZAR" => "R",
        "CHF" => "Fr",
        "SEK" | "NOK" | "DKK" | "ISK" => "kr",
        "CZK" => "Kč",
        "HUF" => "Ft",
        "RON" => "lei",
        "IDR" => "Rp",
        "MYR" => "RM",
        _ => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_codes() {
        assert_eq!(symbol_for("GBP"), "£");
        assert_eq!(symbol_for("AUD"), "$");
        assert_eq!(symbol_for("XAU"), "XAU");
    }
}
