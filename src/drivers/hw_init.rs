//! One-shot hardware peripheral initialization.
//!
//! Configures ADC1 channels, the indicator's LEDC timer/channels, the
//! command UART and RMT strip channels using raw ESP-IDF sys calls. Each
//! init runs once from `main()` (or from a port's `attach`/`begin`) before
//! the dispatch loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    LedcInitFailed(i32),
    UartInitFailed(i32),
    RmtInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)  => write!(f, "ADC1 init failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::UartInitFailed(rc) => write!(f, "UART init failed (rc={})", rc),
            Self::RmtInitFailed(rc)  => write!(f, "RMT TX channel init failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(match e {
            HwInitError::AdcInitFailed(_) => "ADC1",
            HwInitError::LedcInitFailed(_) => "LEDC",
            HwInitError::UartInitFailed(_) => "UART",
            HwInitError::RmtInitFailed(_) => "RMT",
        })
    }
}

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, err: fn(i32) -> HwInitError) -> Result<(), HwInitError> {
    if ret == ESP_OK as i32 { Ok(()) } else { Err(err(ret)) }
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  No concurrent access is possible because
/// `init_adc()` completes before the dispatch loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

/// Bring up ADC1 and configure each of `channels` at 12 dB / 12 bit.
#[cfg(target_os = "espidf")]
pub fn init_adc(channels: &[u8]) -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    check(
        unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) },
        HwInitError::AdcInitFailed,
    )?;

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for &ch in channels {
        // SAFETY: handle initialised above; single-threaded boot path.
        check(
            unsafe { adc_oneshot_config_channel(adc1_handle(), ch as adc_channel_t, &chan_cfg) },
            HwInitError::AdcInitFailed,
        )?;
    }

    info!("hw_init: ADC1 configured (channels {:?})", channels);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc(channels: &[u8]) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ADC1 channels {:?}", channels);
    Ok(())
}

/// One raw ADC1 sample; 0 on a read error.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u8) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel as adc_channel_t, &mut raw) };
    if ret != ESP_OK as i32 {
        log::warn!("hw_init: ADC1 ch{} read failed (rc={})", channel, ret);
        return 0;
    }
    raw.max(0) as u16
}

// ── LEDC PWM (status indicator) ──────────────────────────────

pub const LEDC_CH_LED_R: u32 = 0;
pub const LEDC_CH_LED_G: u32 = 1;
pub const LEDC_CH_LED_B: u32 = 2;

/// Timer 0 at `pins::LED_PWM_FREQ_HZ`, 8-bit; channels 0-2 on the R/G/B GPIOs.
#[cfg(target_os = "espidf")]
pub fn init_ledc_indicator(gpios: [u8; 3]) -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::LED_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: called once from the single main-task context.
    check(unsafe { ledc_timer_config(&timer) }, HwInitError::LedcInitFailed)?;

    let lanes = [LEDC_CH_LED_R, LEDC_CH_LED_G, LEDC_CH_LED_B];
    for (&channel, &gpio) in lanes.iter().zip(gpios.iter()) {
        let cfg = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: gpio as i32,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        check(unsafe { ledc_channel_config(&cfg) }, HwInitError::LedcInitFailed)?;
    }

    info!("hw_init: LEDC indicator on GPIO {:?}", gpios);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc_indicator(); duty
    // register writes are race-free since only the main loop calls this.
    let ret = unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32);
        if ret == ESP_OK as i32 {
            ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel)
        } else {
            ret
        }
    };
    if ret != ESP_OK as i32 {
        log::warn!("hw_init: LEDC ch{} duty update failed (rc={})", channel, ret);
    }
}

// ── UART (command link) ───────────────────────────────────────

/// Driver RX/TX ring sizes in bytes.
pub const UART_RX_BUF: i32 = 256;
pub const UART_TX_BUF: i32 = 256;

/// Install the UART driver on `port` at `baud` 8N1, pins from [`pins`].
#[cfg(target_os = "espidf")]
pub fn init_uart(port: u8, baud: u32) -> Result<(), HwInitError> {
    let port = port as uart_port_t;
    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    // SAFETY: one-time driver install from the main task.
    unsafe {
        check(
            uart_driver_install(port, UART_RX_BUF, UART_TX_BUF, 0, core::ptr::null_mut(), 0),
            HwInitError::UartInitFailed,
        )?;
        check(uart_param_config(port, &cfg), HwInitError::UartInitFailed)?;
        check(
            uart_set_pin(port, pins::UART_TX_GPIO, pins::UART_RX_GPIO, -1, -1),
            HwInitError::UartInitFailed,
        )?;
    }
    info!("hw_init: UART{} at {} baud", port, baud);
    Ok(())
}

// ── RMT (LED strips) ──────────────────────────────────────────

/// RMT tick rate: 10 MHz → 0.1 µs per tick.
pub const RMT_RESOLUTION_HZ: u32 = 10_000_000;

/// WS2812 bit timings in RMT ticks (T0H, T0L, T1H, T1L).
pub const WS2812_T0H: u32 = 3;
pub const WS2812_T0L: u32 = 9;
pub const WS2812_T1H: u32 = 9;
pub const WS2812_T1L: u32 = 3;

/// Pack one RMT symbol: high for `high` ticks, then low for `low` ticks.
pub const fn rmt_symbol(high: u32, low: u32) -> u32 {
    (high & 0x7FFF) | (1 << 15) | ((low & 0x7FFF) << 16)
}

/// TX channel plus bytes encoder for one strip.
#[cfg(target_os = "espidf")]
pub struct RmtStrip {
    pub channel: rmt_channel_handle_t,
    pub encoder: rmt_encoder_handle_t,
}

#[cfg(target_os = "espidf")]
pub fn init_rmt_strip(gpio: u8) -> Result<RmtStrip, HwInitError> {
    let chan_cfg = rmt_tx_channel_config_t {
        gpio_num: gpio as i32,
        clk_src: soc_periph_rmt_clk_src_t_RMT_CLK_SRC_DEFAULT,
        resolution_hz: RMT_RESOLUTION_HZ,
        mem_block_symbols: 48,
        trans_queue_depth: 4,
        ..Default::default()
    };
    let mut channel: rmt_channel_handle_t = core::ptr::null_mut();
    let mut enc_cfg = rmt_bytes_encoder_config_t {
        bit0: rmt_symbol_word_t { val: rmt_symbol(WS2812_T0H, WS2812_T0L) },
        bit1: rmt_symbol_word_t { val: rmt_symbol(WS2812_T1H, WS2812_T1L) },
        ..Default::default()
    };
    enc_cfg.flags.set_msb_first(1);
    let mut encoder: rmt_encoder_handle_t = core::ptr::null_mut();

    // SAFETY: handles are written by the driver; called from the main task.
    unsafe {
        check(rmt_new_tx_channel(&chan_cfg, &mut channel), HwInitError::RmtInitFailed)?;
        check(rmt_new_bytes_encoder(&enc_cfg, &mut encoder), HwInitError::RmtInitFailed)?;
        check(rmt_enable(channel), HwInitError::RmtInitFailed)?;
    }
    info!("hw_init: RMT strip on GPIO {}", gpio);
    Ok(RmtStrip { channel, encoder })
}
