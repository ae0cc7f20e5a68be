use shelf_model::Book;

/// Summary counts over a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub read: usize,
    pub unread: usize,
    pub favorites: usize,
    /// Mean rating of the rated books (`rating > 0`). `0.0` when nothing is
    /// rated.
    pub avg_rating: f64,
}
impl Statistics {
    /// The average rating as displayed, always with one decimal (`"4.0"`).
    ///
    /// Rounds to the nearest tenth by the exact binary value of the mean, with
    /// exact ties going up: 4.25 shows as `"4.3"`, but 23/20 (stored just
    /// below 1.15) shows as `"1.1"`.
    pub fn avg_rating_display(&self) -> String {
        let tenths = round_tenths(self.avg_rating);
        format!("{}.{}", tenths / 10, tenths % 10)
    }
}

/// `value * 10` rounded to an integer, computed exactly from the bits of
/// `value`. Negative, non-finite and vanishingly small values give 0.
fn round_tenths(value: f64) -> u128 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = u128::from(bits & ((1 << 52) - 1));
    let (mantissa, exponent) = match biased {
        0 => (fraction, -1074),
        _ => (fraction | (1 << 52), biased - 1075),
    };
    // value == mantissa * 2^exponent
    let scaled = mantissa * 10;
    if exponent >= 0 {
        // Already an integer; `as` saturates.
        return (value * 10.0) as u128;
    }
    let shift = exponent.unsigned_abs();
    if shift > 120 {
        return 0;
    }
    let whole = scaled >> shift;
    let remainder = scaled - (whole << shift);
    if remainder * 2 >= 1 << shift { whole + 1 } else { whole }
}

/// Aggregate statistics over `books`.
///
/// # Examples
///
/// ```
/// use shelf_library::stats::aggregate;
///
/// let stats = aggregate(&[]);
/// assert_eq!(stats.total, 0);
/// assert_eq!(stats.avg_rating_display(), "0.0");
/// ```
pub fn aggregate(books: &[Book]) -> Statistics {
    let read = books.iter().filter(|book| book.lu).count();
    let favorites = books.iter().filter(|book| book.favorite).count();
    let (rated, sum) = books
        .iter()
        .filter(|book| book.is_rated())
        .fold((0u32, 0u32), |(count, sum), book| (count + 1, sum + u32::from(book.rating)));
    let avg_rating = if rated == 0 { 0.0 } else { f64::from(sum) / f64::from(rated) };
    Statistics {
        total: books.len(),
        read,
        unread: books.len() - read,
        favorites,
        avg_rating,
    }
}
