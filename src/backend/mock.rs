use super::{HapticDevice, HapticSubsystem};
use crate::effect::EffectDefinition;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Init,
    Open(u32),
    NewEffect { device: u32, effect: u32 },
    UpdateEffect { device: u32, effect: u32 },
    DestroyEffect { device: u32, effect: u32 },
    RunEffect { device: u32, effect: u32, iterations: u32 },
    StopEffect { device: u32, effect: u32 },
    Pause(u32),
    Unpause(u32),
    StopAll(u32),
    Close(u32),
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    next_effect: u32,
    fail_init: bool,
    fail_open: bool,
    rejected: Vec<EffectDefinition>,
}

/// Shared view of what the mock hardware has been asked to do
#[derive(Debug, Clone, Default)]
pub struct MockHardware(Rc<RefCell<MockState>>);

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subsystem(&self) -> MockSubsystem {
        MockSubsystem(self.clone())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn fail_init(&self) {
        self.0.borrow_mut().fail_init = true;
    }

    pub fn fail_open(&self, fail: bool) {
        self.0.borrow_mut().fail_open = fail;
    }

    /// Make uploads of `definition` fail on every device
    pub fn reject(&self, definition: EffectDefinition) {
        self.0.borrow_mut().rejected.push(definition);
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.0.borrow_mut().calls.push(call);
    }
}

pub struct MockSubsystem(MockHardware);

impl HapticSubsystem for MockSubsystem {
    type Source = u32;
    type Device = MockDevice;

    fn init(&mut self) -> anyhow::Result<()> {
        self.0.record(Call::Init);
        if self.0.0.borrow().fail_init {
            anyhow::bail!("init refused");
        }
        Ok(())
    }

    fn open(&mut self, source: &u32) -> anyhow::Result<MockDevice> {
        if self.0.0.borrow().fail_open {
            anyhow::bail!("device {source} refused to open");
        }
        self.0.record(Call::Open(*source));
        Ok(MockDevice {
            id: *source,
            name: format!("mock {source}"),
            hardware: self.0.clone(),
        })
    }
}

pub struct MockDevice {
    id: u32,
    name: String,
    hardware: MockHardware,
}

#[derive(Debug)]
pub struct MockEffect(u32);

impl HapticDevice for MockDevice {
    type Effect = MockEffect;

    fn name(&self) -> &str {
        &self.name
    }

    fn new_effect(&mut self, definition: &EffectDefinition) -> anyhow::Result<MockEffect> {
        let effect = {
            let mut state = self.hardware.0.borrow_mut();
            if state.rejected.contains(definition) {
                anyhow::bail!("{} effect rejected", definition.kind_name());
            }
            state.next_effect += 1;
            state.next_effect
        };
        self.hardware.record(Call::NewEffect {
            device: self.id,
            effect,
        });
        Ok(MockEffect(effect))
    }

    fn update_effect(
        &mut self,
        effect: &mut MockEffect,
        definition: &EffectDefinition,
    ) -> anyhow::Result<()> {
        if self.hardware.0.borrow().rejected.contains(definition) {
            anyhow::bail!("{} effect rejected", definition.kind_name());
        }
        self.hardware.record(Call::UpdateEffect {
            device: self.id,
            effect: effect.0,
        });
        Ok(())
    }

    fn destroy_effect(&mut self, effect: MockEffect) {
        self.hardware.record(Call::DestroyEffect {
            device: self.id,
            effect: effect.0,
        });
    }

    fn run_effect(&mut self, effect: &mut MockEffect, iterations: u32) -> anyhow::Result<()> {
        self.hardware.record(Call::RunEffect {
            device: self.id,
            effect: effect.0,
            iterations,
        });
        Ok(())
    }

    fn stop_effect(&mut self, effect: &mut MockEffect) -> anyhow::Result<()> {
        self.hardware.record(Call::StopEffect {
            device: self.id,
            effect: effect.0,
        });
        Ok(())
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.hardware.record(Call::Pause(self.id));
        Ok(())
    }

    fn unpause(&mut self) -> anyhow::Result<()> {
        self.hardware.record(Call::Unpause(self.id));
        Ok(())
    }

    fn stop_all(&mut self) -> anyhow::Result<()> {
        self.hardware.record(Call::StopAll(self.id));
        Ok(())
    }

    fn close(self) {
        self.hardware.record(Call::Close(self.id));
    }
}
