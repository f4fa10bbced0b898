use cosim_core::bridge::BridgeMmio;
use mockall::mock;

mock! {
    pub Mmio {}
    impl BridgeMmio for Mmio {
        fn read(&mut self, addr: u64) -> u32;
        fn write(&mut self, addr: u64, value: u32);
    }
}
