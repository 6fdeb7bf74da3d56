/// Thousands separators for counts shown in logs and listings.
pub trait Commas {
    fn commas(&self) -> String;
}

macro_rules! impl_commas {
    ($($int:ty),*) => {
        $(
            impl Commas for $int {
                fn commas(&self) -> String {
                    let digits = self.to_string();
                    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

                    for (index, digit) in digits.chars().enumerate() {
                        if index != 0 && (digits.len() - index) % 3 == 0 {
                            formatted.push(',');
                        }

                        formatted.push(digit);
                    }

                    formatted
                }
            }
        )*
    };
}

impl_commas!(u32, u64, usize);
