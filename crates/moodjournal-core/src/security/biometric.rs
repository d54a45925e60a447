/// Text shown by the platform biometric prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiometricPrompt {
    pub message: String,
    pub fallback_label: String,
    pub cancel_label: String,
    /// Allow the device passcode as a fallback.
    pub allow_device_fallback: bool,
}

impl Default for BiometricPrompt {
    fn default() -> Self {
        Self {
            message: "Authenticate to access your journal".into(),
            fallback_label: "Use PIN instead".into(),
            cancel_label: "Cancel".into(),
            allow_device_fallback: true,
        }
    }
}

/// Platform biometric service.
pub trait BiometricAuthenticator {
    /// Hardware present and enrolled.
    fn is_available(&self) -> bool;

    /// Run one prompt. Any failure, including cancellation, is `false`.
    fn authenticate(&mut self, prompt: &BiometricPrompt) -> bool;
}

/// For hosts without biometric hardware.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBiometric;

impl BiometricAuthenticator for NoBiometric {
    fn is_available(&self) -> bool {
        false
    }

    fn authenticate(&mut self, _prompt: &BiometricPrompt) -> bool {
        false
    }
}
