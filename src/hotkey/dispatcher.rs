//! Maps hotkey activations onto mute commands.

use super::{Chord, HotkeyError};
use crate::controller::MuteCommands;
use tracing::{debug, info, warn};

/// What a chord does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyCommand {
    Mute,
    Unmute,
}

/// Identifier assigned by the OS facility to a registered chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(pub i32);

/// The OS global-hotkey facility.
pub trait HotkeyRegistrar {
    /// Claim `chord` system-wide. Fails with [`HotkeyError::Conflict`] when
    /// another process already owns it.
    fn register(&mut self, chord: &Chord) -> Result<BindingId, HotkeyError>;

    fn unregister(&mut self, id: BindingId);
}

/// One chord-to-command binding. `id` is `None` while the chord is not
/// registered.
#[derive(Debug, Clone)]
pub struct HotkeyBinding {
    pub chord: Chord,
    pub command: HotkeyCommand,
    pub id: Option<BindingId>,
}

/// Owns the two global bindings and routes their activations.
pub struct HotkeyDispatcher<R: HotkeyRegistrar> {
    registrar: R,
    bindings: Vec<HotkeyBinding>,
}

impl<R: HotkeyRegistrar> HotkeyDispatcher<R> {
    pub fn new(registrar: R, mute: Chord, unmute: Chord) -> Self {
        let binding = |chord, command| HotkeyBinding {
            chord,
            command,
            id: None,
        };
        Self {
            registrar,
            bindings: vec![
                binding(mute, HotkeyCommand::Mute),
                binding(unmute, HotkeyCommand::Unmute),
            ],
        }
    }

    /// Register every binding that is not registered yet.
    ///
    /// Each failure is logged once and returned; the failed binding stays
    /// inactive for the session while the others keep working.
    pub fn register_all(&mut self) -> Vec<HotkeyError> {
        let mut failures = Vec::new();
        for binding in self.bindings.iter_mut().filter(|b| b.id.is_none()) {
            match self.registrar.register(&binding.chord) {
                Ok(id) => {
                    info!(chord = %binding.chord, command = ?binding.command, "hotkey registered");
                    binding.id = Some(id);
                }
                Err(e) => {
                    warn!(
                        chord = %binding.chord,
                        command = ?binding.command,
                        error = %e,
                        "hotkey inactive"
                    );
                    failures.push(e);
                }
            }
        }
        failures
    }

    pub fn bindings(&self) -> &[HotkeyBinding] {
        &self.bindings
    }

    pub fn command_for(&self, id: BindingId) -> Option<HotkeyCommand> {
        self.bindings
            .iter()
            .find(|b| b.id == Some(id))
            .map(|b| b.command)
    }

    /// Handle one activation signal. Returns false for unknown ids.
    pub fn dispatch(&self, id: BindingId, target: &mut impl MuteCommands) -> bool {
        let Some(command) = self.command_for(id) else {
            debug!(?id, "activation for unknown hotkey");
            return false;
        };
        debug!(?command, "hotkey activated");
        match command {
            HotkeyCommand::Mute => target.mute(),
            HotkeyCommand::Unmute => target.unmute(),
        }
        true
    }

    /// Manual activation from the indicator icon.
    pub fn toggle(&self, target: &mut impl MuteCommands) {
        debug!("manual toggle");
        target.toggle();
    }

    pub fn unregister_all(&mut self) {
        for binding in &mut self.bindings {
            if let Some(id) = binding.id.take() {
                self.registrar.unregister(id);
                debug!(chord = %binding.chord, "hotkey unregistered");
            }
        }
    }
}

impl<R: HotkeyRegistrar> Drop for HotkeyDispatcher<R> {
    fn drop(&mut self) {
        self.unregister_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::Harness;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    /// Hotkey table shared by every "process" in a test.
    #[derive(Clone, Default)]
    struct FakeRegistrar {
        taken: Rc<RefCell<HashSet<Chord>>>,
        ours: Rc<RefCell<Vec<(BindingId, Chord)>>>,
        next_id: i32,
    }

    impl HotkeyRegistrar for FakeRegistrar {
        fn register(&mut self, chord: &Chord) -> Result<BindingId, HotkeyError> {
            if !self.taken.borrow_mut().insert(*chord) {
                return Err(HotkeyError::Conflict { chord: *chord });
            }
            self.next_id += 1;
            let id = BindingId(self.next_id);
            self.ours.borrow_mut().push((id, *chord));
            Ok(id)
        }

        fn unregister(&mut self, id: BindingId) {
            let mut ours = self.ours.borrow_mut();
            if let Some(pos) = ours.iter().position(|(i, _)| *i == id) {
                let (_, chord) = ours.remove(pos);
                self.taken.borrow_mut().remove(&chord);
            }
        }
    }

    #[derive(Default)]
    struct Calls {
        mute: usize,
        unmute: usize,
        toggle: usize,
    }

    impl MuteCommands for Calls {
        fn mute(&mut self) {
            self.mute += 1;
        }
        fn unmute(&mut self) {
            self.unmute += 1;
        }
        fn toggle(&mut self) {
            self.toggle += 1;
        }
    }

    fn dispatcher(registrar: FakeRegistrar) -> HotkeyDispatcher<FakeRegistrar> {
        HotkeyDispatcher::new(registrar, Chord::alt_shift('P'), Chord::alt_shift('O'))
    }

    fn id_for(d: &HotkeyDispatcher<FakeRegistrar>, command: HotkeyCommand) -> Option<BindingId> {
        d.bindings().iter().find(|b| b.command == command)?.id
    }

    #[test]
    fn each_activation_invokes_its_command_once() {
        let mut d = dispatcher(FakeRegistrar::default());
        assert!(d.register_all().is_empty());
        let mut calls = Calls::default();

        assert!(d.dispatch(id_for(&d, HotkeyCommand::Mute).unwrap(), &mut calls));
        assert!(d.dispatch(id_for(&d, HotkeyCommand::Unmute).unwrap(), &mut calls));
        assert!(d.dispatch(id_for(&d, HotkeyCommand::Unmute).unwrap(), &mut calls));
        assert!(!d.dispatch(BindingId(99), &mut calls));
        d.toggle(&mut calls);

        assert_eq!((calls.mute, calls.unmute, calls.toggle), (1, 2, 1));
    }

    #[test]
    fn conflict_disables_only_that_binding() {
        let registrar = FakeRegistrar::default();
        registrar.taken.borrow_mut().insert(Chord::alt_shift('P'));

        let mut d = dispatcher(registrar);
        let failures = d.register_all();

        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0],
            HotkeyError::Conflict { chord } if chord == Chord::alt_shift('P')
        ));
        assert!(id_for(&d, HotkeyCommand::Mute).is_none());
        let unmute = id_for(&d, HotkeyCommand::Unmute).unwrap();

        let mut h = Harness::with_device("headset", "Headset Microphone", true);
        h.controller.refresh_device();
        h.settle();
        assert!(d.dispatch(unmute, &mut h.controller));
        h.settle();
        assert!(!h.controller.is_muted());
    }

    #[test]
    fn drop_releases_registered_chords() {
        let registrar = FakeRegistrar::default();
        let taken = Rc::clone(&registrar.taken);
        {
            let mut d = dispatcher(registrar);
            d.register_all();
            assert_eq!(taken.borrow().len(), 2);
        }
        assert!(taken.borrow().is_empty());
    }

    #[test]
    fn hotkeys_drive_the_controller() {
        let mut d = dispatcher(FakeRegistrar::default());
        d.register_all();
        let mute = id_for(&d, HotkeyCommand::Mute).unwrap();
        let unmute = id_for(&d, HotkeyCommand::Unmute).unwrap();

        let mut h = Harness::with_device("headset", "Headset Microphone", false);
        h.controller.refresh_device();
        h.settle();
        assert!(h.controller.is_muted());

        d.dispatch(unmute, &mut h.controller);
        h.settle();
        assert!(!h.controller.is_muted());

        d.dispatch(mute, &mut h.controller);
        h.settle();
        assert!(h.controller.is_muted());

        d.toggle(&mut h.controller);
        h.settle();
        assert!(!h.controller.is_muted());
        assert_eq!(h.controller.presenter().cues(), vec![true, false, true, false]);
    }
}
