use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

// Provably-fair random stream:
// HMAC-SHA256(key = server_seed, msg = "client_seed:nonce:block") -> 32 bytes per block.
// The server publishes sha256(server_seed) before play and reveals the seed on
// rotation, so every round can be replayed from (server_seed, client_seed, nonce).

pub type HmacSha256 = Hmac<Sha256>;

const BLOCK_LEN: usize = 32;

pub fn derive_hash_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct ProvablyFairRng {
    server_seed: String, // secret until rotation
    client_seed: String,
    nonce: u64,
    block: u64,
    buffer: [u8; BLOCK_LEN],
    pos: usize,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            block: 0,
            buffer: [0u8; BLOCK_LEN],
            pos: BLOCK_LEN,
        }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    /// HMAC output for one block of the stream.
    pub fn hmac_block(&self, block: u64) -> [u8; BLOCK_LEN] {
        // HMAC takes keys of any length
        let mut mac =
            HmacSha256::new_from_slice(self.server_seed.as_bytes()).expect("HMAC key");
        let msg = format!("{}:{}:{}", self.client_seed, self.nonce, block);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; BLOCK_LEN];
        out.copy_from_slice(&res);
        out
    }

    fn refill(&mut self) {
        self.buffer = self.hmac_block(self.block);
        self.block += 1;
        self.pos = 0;
    }
}

impl RngCore for ProvablyFairRng {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_be_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut written = 0;
        while written < dest.len() {
            if self.pos == BLOCK_LEN {
                self.refill();
            }
            let take = (BLOCK_LEN - self.pos).min(dest.len() - written);
            dest[written..written + take].copy_from_slice(&self.buffer[self.pos..self.pos + take]);
            self.pos += take;
            written += take;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
