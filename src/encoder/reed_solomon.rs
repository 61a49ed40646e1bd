/// Reed-Solomon error correction for QR codes
/// QR codes use RS over GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
/// GF(256) field operations using log/exp tables
pub struct Gf256;

/// Primitive polynomial 0x11D
const PRIMITIVE: u16 = 0x11D;

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    table[255] = 1;
    table
}

const fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const EXP: [u8; 256] = build_exp_table();

static EXP_TABLE: [u8; 256] = EXP;
static LOG_TABLE: [u8; 256] = build_log_table(&EXP);

impl Gf256 {
    /// Product in GF(2^8)
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + log_b) % 255]
    }

    /// alpha^n
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    #[cfg(test)]
    fn pow(a: u8, n: usize) -> u8 {
        if a == 0 {
            return if n == 0 { 1 } else { 0 };
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        EXP_TABLE[(log_a * (n % 255)) % 255]
    }
}

/// Reed-Solomon encoder for a fixed number of EC codewords
pub struct ReedSolomonEncoder {
    /// Generator coefficients without the leading 1, highest degree first
    generator: Vec<u8>,
}

impl ReedSolomonEncoder {
    /// Generator polynomial (x - a^0)(x - a^1)...(x - a^(n-1))
    pub fn new(num_ecc_codewords: usize) -> Self {
        // Coefficients highest degree first; the leading 1 is implicit
        let mut generator = vec![0u8; num_ecc_codewords];
        if let Some(last) = generator.last_mut() {
            *last = 1;
        }
        let mut root = 1u8;
        for _ in 0..num_ecc_codewords {
            for j in 0..num_ecc_codewords {
                generator[j] = Gf256::mul(generator[j], root);
                if j + 1 < num_ecc_codewords {
                    generator[j] ^= generator[j + 1];
                }
            }
            root = Gf256::mul(root, 0x02);
        }
        Self { generator }
    }

    /// Remainder of data * x^n divided by the generator
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let n = self.generator.len();
        let mut remainder = vec![0u8; n];
        for &d in data {
            let factor = d ^ remainder.first().copied().unwrap_or(0);
            remainder.rotate_left(1);
            if let Some(last) = remainder.last_mut() {
                *last = 0;
            }
            for (r, &g) in remainder.iter_mut().zip(&self.generator) {
                *r ^= Gf256::mul(g, factor);
            }
        }
        remainder
    }
}

/// Split data codewords into blocks, compute EC for each and interleave.
///
/// Short blocks come first; long blocks carry one more data codeword.
pub fn add_ecc_and_interleave(data: &[u8], num_blocks: usize, ecc_per_block: usize) -> Vec<u8> {
    let total_data = data.len();
    let short_len = total_data / num_blocks;
    let num_long = total_data % num_blocks;
    let num_short = num_blocks - num_long;

    let rs = ReedSolomonEncoder::new(ecc_per_block);
    let mut data_blocks: Vec<&[u8]> = Vec::with_capacity(num_blocks);
    let mut ecc_blocks: Vec<Vec<u8>> = Vec::with_capacity(num_blocks);
    let mut offset = 0;
    for i in 0..num_blocks {
        let len = short_len + usize::from(i >= num_short);
        let block = &data[offset..offset + len];
        ecc_blocks.push(rs.encode(block));
        data_blocks.push(block);
        offset += len;
    }

    let mut result = Vec::with_capacity(total_data + num_blocks * ecc_per_block);
    for i in 0..=short_len {
        for block in &data_blocks {
            if let Some(&b) = block.get(i) {
                result.push(b);
            }
        }
    }
    for i in 0..ecc_per_block {
        for block in &ecc_blocks {
            result.push(block[i]);
        }
    }
    result
}
