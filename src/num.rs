use alloy::primitives::U256;
use fastnum::{
    bint,
    decimal::{Context, RoundingMode, UnsignedDecimal},
};

/// Number of decimals of order book amounts and prices.
pub const WAD_DECIMALS: u8 = 18;

/// Fixed-point one: order book amounts and prices are scaled by it.
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// `10^decimals`, `None` if it does not fit 256 bits.
pub fn pow10(decimals: u8) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(decimals))
}

/// `amount * price / 1e18`, truncating, multiplication first.
pub fn mul_wad(amount: U256, price: U256) -> Option<U256> {
    amount.checked_mul(price).map(|product| product / WAD)
}

/// Rescale fixed-point value from `from` to `to` decimals as
/// `value * 10^to / 10^from`, truncating.
///
/// The multiplication happens before the division, so the result equals
/// the exact big integer computation whenever the product fits 256 bits.
pub fn rescale(value: U256, from: u8, to: u8) -> Option<U256> {
    let numerator = value.checked_mul(pow10(to)?)?;
    Some(numerator / pow10(from)?)
}

/// Fixed-point to decimal converter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    decimals: i32,
}

impl Converter {
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals: decimals as i32,
        }
    }

    /// Converter for order book amounts and prices.
    pub fn wad() -> Self {
        Self::new(WAD_DECIMALS)
    }

    pub fn from_unsigned<const N: usize>(&self, value: U256) -> UnsignedDecimal<N> {
        let unscaled = bint::UInt::<N>::from_le_slice(value.as_le_slice())
            .expect("Converter: U256 -> UInt::<N>");
        UnsignedDecimal::<N>::from_parts(
            unscaled,
            -self.decimals,
            Context::default().with_rounding_mode(RoundingMode::Floor),
        )
    }

    pub fn to_unsigned<const N: usize>(&self, value: UnsignedDecimal<N>) -> U256 {
        let rescaled = value.rescale(self.decimals as i16);
        U256::from_le_slice(rescaled.digits().to_radix_le(256).as_slice())
    }
}
